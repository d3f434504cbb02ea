//! Integration tests for the justification document upload endpoint.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use common::{
    body_json, FakeAttendanceStore, FakeInstitutionDirectory, FakeStudentDirectory,
};

const BOUNDARY: &str = "test-boundary-7d93a";

fn upload_app(upload_dir: &std::path::Path) -> Router {
    let mut config = common::test_config();
    config.upload_dir = upload_dir.to_string_lossy().into_owned();
    common::build_test_app_with_config(
        Arc::new(FakeAttendanceStore::new()),
        Arc::new(FakeStudentDirectory::default()),
        Arc::new(FakeInstitutionDirectory::default()),
        config,
    )
}

fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: Router, field: &str, filename: &str, content: &[u8]) -> axum::response::Response {
    let request = Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, filename, content)))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn upload_stores_file_and_answers_location() {
    let dir = tempfile::tempdir().unwrap();
    let app = upload_app(dir.path());

    let response = upload(app, "file", "justificacion.pdf", b"%PDF-1.4 contenido").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;

    let filename = json["filename"].as_str().unwrap();
    assert!(filename.ends_with(".pdf"));
    assert_eq!(json["originalName"], "justificacion.pdf");
    assert_eq!(
        json["url"],
        format!("/uploads/justifications/{filename}")
    );

    // The document landed on disk under the generated name.
    let stored = std::fs::read(dir.path().join(filename)).unwrap();
    assert_eq!(stored, b"%PDF-1.4 contenido");
}

#[tokio::test]
async fn upload_generates_distinct_names_for_same_original() {
    let dir = tempfile::tempdir().unwrap();
    let app = upload_app(dir.path());

    let first = body_json(upload(app.clone(), "file", "doc.pdf", b"uno").await).await;
    let second = body_json(upload(app, "file", "doc.pdf", b"dos").await).await;

    assert_ne!(first["filename"], second["filename"]);
}

#[tokio::test]
async fn upload_rejects_disallowed_extension() {
    let dir = tempfile::tempdir().unwrap();
    let app = upload_app(dir.path());

    let response = upload(app, "file", "script.exe", b"MZ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "Tipo de archivo no permitido. Solo se permiten: PDF, JPG, PNG, DOC, DOCX"
    );
    // Nothing was written.
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn upload_rejects_oversize_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = upload_app(dir.path());

    let oversized = vec![0u8; 5 * 1024 * 1024 + 1];
    let response = upload(app, "file", "grande.pdf", &oversized).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(
        json["message"],
        "El archivo supera el tamaño máximo permitido de 5 MB"
    );
}

#[tokio::test]
async fn upload_requires_the_file_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = upload_app(dir.path());

    let response = upload(app, "attachment", "doc.pdf", b"contenido").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Missing required 'file' field");
}
