//! Justification document upload.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Extensions accepted for justification documents.
const ALLOWED_EXTENSIONS: [&str; 6] = [".pdf", ".jpg", ".jpeg", ".png", ".doc", ".docx"];

/// Size ceiling for one document (5 MB).
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// POST /api/files/upload
///
/// Accepts a multipart form with a required `file` field. The document
/// is stored under the configured upload directory with a generated
/// unique name; the answer carries the name, the retrievable URL and
/// the original filename.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("documento").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file_data = Some((filename, data.to_vec()));
        }
    }

    let (original_name, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let extension = valid_extension(&original_name).ok_or_else(|| {
        AppError::BadRequest(
            "Tipo de archivo no permitido. Solo se permiten: PDF, JPG, PNG, DOC, DOCX".into(),
        )
    })?;

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(
            "El archivo supera el tamaño máximo permitido de 5 MB".into(),
        ));
    }

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let unique_id: String = uuid::Uuid::new_v4().to_string().chars().take(8).collect();
    let stored_filename = format!("{timestamp}_{unique_id}{extension}");

    let upload_dir = std::path::PathBuf::from(&state.config.upload_dir);
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let file_path = upload_dir.join(&stored_filename);
    tokio::fs::write(&file_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    tracing::info!(filename = %stored_filename, "File uploaded");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "filename": stored_filename,
            "url": format!("/uploads/justifications/{stored_filename}"),
            "originalName": original_name,
        })),
    ))
}

/// The file's extension (with dot, lowercased) when it is on the
/// allow-list.
fn valid_extension(filename: &str) -> Option<String> {
    let lower = filename.to_lowercase();
    ALLOWED_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(**ext))
        .map(|ext| ext.to_string())
}
