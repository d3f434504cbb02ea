use axum::routing::{delete, get, patch, post, put};
use axum::Router;

use crate::handlers::{attendance, reference};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(attendance::create))
        .route("/", get(attendance::get_all))
        .route("/bulk", post(attendance::create_bulk))
        .route("/{id}", get(attendance::get_by_id))
        .route("/{id}", put(attendance::update))
        .route("/{id}", delete(attendance::delete))
        .route("/{id}/justify", patch(attendance::justify))
        .route("/student/{student_id}", get(attendance::get_by_student))
        .route(
            "/student/{student_id}/range",
            get(attendance::get_by_student_and_date_range),
        )
        .route("/student/{student_id}/stats", get(attendance::get_stats))
        .route(
            "/classroom/{classroom_id}",
            get(attendance::get_by_classroom),
        )
        .route(
            "/classroom/{classroom_id}/date/{date}",
            get(attendance::get_by_classroom_and_date),
        )
        .route(
            "/institution/{institution_id}",
            get(attendance::get_by_institution),
        )
        .route("/date/{date}", get(attendance::get_by_date))
        .route("/reference/students", get(reference::all_students))
        .route(
            "/reference/students/institution/{institution_id}",
            get(reference::students_by_institution),
        )
        .route("/reference/classrooms", get(reference::all_classrooms))
        .route(
            "/reference/classrooms/institution/{institution_id}",
            get(reference::classrooms_by_institution),
        )
        .route("/reference/institutions", get(reference::all_institutions))
}
