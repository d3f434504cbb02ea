//! Reference list endpoints backed directly by the registries.
//!
//! These feed selection dropdowns, so a registry outage degrades to an
//! empty list instead of failing the request.

use axum::extract::{Path, State};
use axum::Json;

use asistencia_clients::{ClassroomDto, InstitutionDto, StudentDto};

use crate::dto::{ExtendedReferenceDto, ReferenceDto};
use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/attendance/reference/students
pub async fn all_students(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ExtendedReferenceDto>>> {
    let students = state
        .service
        .students()
        .all_students()
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Student registry unavailable");
            Vec::new()
        });
    Ok(Json(students.iter().map(student_reference).collect()))
}

/// GET /api/attendance/reference/students/institution/{institution_id}
pub async fn students_by_institution(
    State(state): State<AppState>,
    Path(institution_id): Path<String>,
) -> AppResult<Json<Vec<ExtendedReferenceDto>>> {
    let students = state
        .service
        .students()
        .students_by_institution(&institution_id)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, institution_id, "Student registry unavailable");
            Vec::new()
        });
    Ok(Json(students.iter().map(student_reference).collect()))
}

/// GET /api/attendance/reference/classrooms
pub async fn all_classrooms(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ExtendedReferenceDto>>> {
    let classrooms = state
        .service
        .institutions()
        .all_classrooms()
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Institution registry unavailable");
            Vec::new()
        });
    Ok(Json(classrooms.iter().map(classroom_reference).collect()))
}

/// GET /api/attendance/reference/classrooms/institution/{institution_id}
pub async fn classrooms_by_institution(
    State(state): State<AppState>,
    Path(institution_id): Path<String>,
) -> AppResult<Json<Vec<ExtendedReferenceDto>>> {
    let classrooms = state
        .service
        .institutions()
        .classrooms_by_institution(&institution_id)
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, institution_id, "Institution registry unavailable");
            Vec::new()
        });
    Ok(Json(classrooms.iter().map(classroom_reference).collect()))
}

/// GET /api/attendance/reference/institutions
pub async fn all_institutions(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<ReferenceDto>>> {
    let institutions = state
        .service
        .institutions()
        .all_institutions()
        .await
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Institution registry unavailable");
            Vec::new()
        });
    Ok(Json(
        institutions.iter().map(institution_reference).collect(),
    ))
}

fn student_reference(student: &StudentDto) -> ExtendedReferenceDto {
    ExtendedReferenceDto {
        id: student.effective_id().map(str::to_string),
        name: student.display_name(),
        institution_id: student.institution_id.clone(),
        classroom_id: student.classroom_id.clone(),
    }
}

fn classroom_reference(classroom: &ClassroomDto) -> ExtendedReferenceDto {
    ExtendedReferenceDto {
        id: classroom.effective_id().map(str::to_string),
        name: classroom.display_name(),
        institution_id: classroom.effective_institution_id().map(str::to_string),
        classroom_id: None,
    }
}

fn institution_reference(institution: &InstitutionDto) -> ReferenceDto {
    ReferenceDto {
        id: institution.effective_id().map(str::to_string),
        name: institution.display_name(),
    }
}
