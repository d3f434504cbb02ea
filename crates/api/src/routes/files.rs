use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;

use crate::handlers::files;
use crate::state::AppState;

/// Multipart body ceiling. Slightly above the per-file limit so the
/// handler, not the extractor, produces the oversize rejection.
const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(files::upload))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}
