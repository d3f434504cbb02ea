pub mod attendance;
pub mod files;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /attendance                                   create, list all
/// /attendance/{id}                              get, update, delete
/// /attendance/{id}/justify                      justify (PATCH)
/// /attendance/bulk                              bulk create (POST)
/// /attendance/student/{student_id}              by student
/// /attendance/student/{student_id}/range        by student + date range
/// /attendance/student/{student_id}/stats        statistics
/// /attendance/classroom/{classroom_id}          by classroom
/// /attendance/classroom/{classroom_id}/date/{date}  by classroom + date
/// /attendance/institution/{institution_id}      by institution
/// /attendance/date/{date}                       by date
/// /attendance/reference/...                     registry reference lists
///
/// /files/upload                                 justification upload
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/attendance", attendance::router())
        .nest("/files", files::router())
}
