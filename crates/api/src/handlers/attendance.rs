//! Handlers for the `/attendance` resource.
//!
//! Handlers stay thin: validate the body, delegate to
//! [`AttendanceService`], and shape the HTTP answer.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use validator::Validate;

use asistencia_core::stats::AttendanceStats;
use asistencia_core::types::{Day, RecordId};

use crate::dto::{
    AttendanceRequest, AttendanceResponse, BulkAttendanceRequest, BulkAttendanceResponse,
    DateRangeQuery, JustificationRequest, UpdateAttendanceRequest,
};
use crate::error::AppResult;
use crate::state::AppState;

/// POST /api/attendance
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<AttendanceRequest>,
) -> AppResult<(StatusCode, Json<AttendanceResponse>)> {
    request.validate()?;
    let response = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/attendance/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<Json<AttendanceResponse>> {
    let response = state.service.get_by_id(id).await?;
    Ok(Json(response))
}

/// GET /api/attendance
pub async fn get_all(State(state): State<AppState>) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state.service.get_all().await?;
    Ok(Json(responses))
}

/// GET /api/attendance/student/{student_id}
pub async fn get_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state.service.get_by_student(&student_id).await?;
    Ok(Json(responses))
}

/// GET /api/attendance/classroom/{classroom_id}
pub async fn get_by_classroom(
    State(state): State<AppState>,
    Path(classroom_id): Path<String>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state.service.get_by_classroom(&classroom_id).await?;
    Ok(Json(responses))
}

/// GET /api/attendance/institution/{institution_id}
pub async fn get_by_institution(
    State(state): State<AppState>,
    Path(institution_id): Path<String>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state.service.get_by_institution(&institution_id).await?;
    Ok(Json(responses))
}

/// GET /api/attendance/date/{date}
pub async fn get_by_date(
    State(state): State<AppState>,
    Path(date): Path<Day>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state.service.get_by_date(date).await?;
    Ok(Json(responses))
}

/// GET /api/attendance/classroom/{classroom_id}/date/{date}
pub async fn get_by_classroom_and_date(
    State(state): State<AppState>,
    Path((classroom_id, date)): Path<(String, Day)>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state
        .service
        .get_by_classroom_and_date(&classroom_id, date)
        .await?;
    Ok(Json(responses))
}

/// GET /api/attendance/student/{student_id}/range?startDate=..&endDate=..
pub async fn get_by_student_and_date_range(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<Vec<AttendanceResponse>>> {
    let responses = state
        .service
        .get_by_student_and_date_range(&student_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(responses))
}

/// GET /api/attendance/student/{student_id}/stats?startDate=..&endDate=..
pub async fn get_stats(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Query(range): Query<DateRangeQuery>,
) -> AppResult<Json<AttendanceStats>> {
    let stats = state
        .service
        .get_stats(&student_id, range.start_date, range.end_date)
        .await?;
    Ok(Json(stats))
}

/// PUT /api/attendance/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(request): Json<UpdateAttendanceRequest>,
) -> AppResult<Json<AttendanceResponse>> {
    let response = state.service.update(id, request).await?;
    Ok(Json(response))
}

/// PATCH /api/attendance/{id}/justify
pub async fn justify(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
    Json(request): Json<JustificationRequest>,
) -> AppResult<Json<AttendanceResponse>> {
    request.validate()?;
    let response = state.service.justify(id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/attendance/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<RecordId>,
) -> AppResult<StatusCode> {
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/attendance/bulk
///
/// Always answers 201: partial failure is reported in the breakdown,
/// never as an HTTP error.
pub async fn create_bulk(
    State(state): State<AppState>,
    Json(request): Json<BulkAttendanceRequest>,
) -> AppResult<(StatusCode, Json<BulkAttendanceResponse>)> {
    request.validate()?;
    let response = state.service.create_bulk(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
