use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use asistencia_core::error::CoreError;
use asistencia_db::StoreError;

/// Message for the duplicate student/date rule, shared between the
/// fast-path check and the unique-constraint backstop.
pub const DUPLICATE_RECORD_MSG: &str =
    "Ya existe un registro de asistencia para este estudiante en esta fecha";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the uniform error envelope
/// `{timestamp, status, error, message[, fieldErrors]}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `asistencia_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence error from the attendance store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Request-body validation failures, reported per field.
    #[error("Validation failed")]
    FieldValidation(#[from] validator::ValidationErrors),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut field_errors: Option<serde_json::Value> = None;

        let (status, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Store(err) => classify_store_error(err),

            AppError::FieldValidation(errors) => {
                field_errors = Some(field_error_map(errors));
                (StatusCode::BAD_REQUEST, "Validation failed".to_string())
            }

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "timestamp": chrono::Utc::now(),
            "status": status.as_u16(),
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": message,
        });
        if let Some(errors) = field_errors {
            body["fieldErrors"] = errors;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a store error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - The `uq_attendance_student_date` unique violation maps to 409 with
///   the domain duplicate message (the check-then-insert race lost).
/// - Everything else maps to 500 with a sanitized message.
fn classify_store_error(err: &StoreError) -> (StatusCode, String) {
    if err.is_unique_violation() {
        return (StatusCode::CONFLICT, DUPLICATE_RECORD_MSG.to_string());
    }

    match err {
        StoreError::Database(sqlx::Error::RowNotFound) => {
            (StatusCode::NOT_FOUND, "Resource not found".to_string())
        }
        other => {
            tracing::error!(error = %other, "Store error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Flatten [`validator::ValidationErrors`] into a `{field: message}` map.
fn field_error_map(errors: &validator::ValidationErrors) -> serde_json::Value {
    let map: serde_json::Map<String, serde_json::Value> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "invalid value".to_string());
            (field.to_string(), serde_json::Value::String(message))
        })
        .collect();
    serde_json::Value::Object(map)
}
