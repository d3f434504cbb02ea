//! Request and response bodies for the attendance endpoints.
//!
//! Wire field names are camelCase, matching the upstream consumers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use asistencia_core::status::AttendanceStatus;
use asistencia_core::types::{Day, RecordId, TimeOfDay, Timestamp};
use asistencia_db::models::AttendanceRecord;

/// Body for `POST /api/attendance`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[validate(length(min = 1, message = "Student ID is required"))]
    pub student_id: String,
    #[validate(length(min = 1, message = "Classroom ID is required"))]
    pub classroom_id: String,
    #[validate(length(min = 1, message = "Institution ID is required"))]
    pub institution_id: String,
    pub attendance_date: Day,
    pub academic_year: i32,
    pub attendance_status: AttendanceStatus,
    pub arrival_time: Option<TimeOfDay>,
    /// Forbidden at creation; departure is only ever set via update.
    pub departure_time: Option<TimeOfDay>,
    pub justified: Option<bool>,
    pub justification_reason: Option<String>,
    pub justification_document_url: Option<String>,
    #[validate(length(min = 1, message = "Registered by is required"))]
    pub registered_by: String,
}

/// Body for `PUT /api/attendance/{id}`.
///
/// Only the lifecycle fields are mutable; identifiers, date and academic
/// year are fixed at creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttendanceRequest {
    pub attendance_status: AttendanceStatus,
    pub departure_time: Option<TimeOfDay>,
    pub justified: Option<bool>,
    pub justification_reason: Option<String>,
    pub justification_document_url: Option<String>,
}

/// Body for `PATCH /api/attendance/{id}/justify`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct JustificationRequest {
    #[validate(length(min = 1, message = "Justification reason is required"))]
    pub justification_reason: String,
    pub justification_document_url: Option<String>,
}

/// Body for `POST /api/attendance/bulk`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceRequest {
    #[validate(length(min = 1, message = "La lista de estudiantes no puede estar vacía"))]
    pub student_ids: Vec<String>,
    #[validate(length(min = 1, message = "El ID del aula es requerido"))]
    pub classroom_id: String,
    #[validate(length(min = 1, message = "El ID de la institución es requerido"))]
    pub institution_id: String,
    pub attendance_date: Day,
    pub academic_year: i32,
    pub attendance_status: AttendanceStatus,
    pub arrival_time: TimeOfDay,
    #[validate(length(min = 1, message = "El usuario que registra es requerido"))]
    pub registered_by: String,
}

/// An attendance record as returned to clients, optionally enriched
/// with resolved display names. The name fields are only present on
/// read paths; create/update/bulk answers return the bare record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: RecordId,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
    pub classroom_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_name: Option<String>,
    pub institution_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_name: Option<String>,
    pub attendance_date: Day,
    pub academic_year: i32,
    pub attendance_status: AttendanceStatus,
    pub arrival_time: Option<TimeOfDay>,
    pub departure_time: Option<TimeOfDay>,
    pub justified: bool,
    pub justification_reason: Option<String>,
    pub justification_document_url: Option<String>,
    pub registered_by: String,
    pub registered_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AttendanceResponse {
    /// Response with resolved display names (read paths).
    pub fn enriched(
        record: AttendanceRecord,
        student_name: String,
        classroom_name: String,
        institution_name: String,
    ) -> Self {
        let mut response = Self::from(record);
        response.student_name = Some(student_name);
        response.classroom_name = Some(classroom_name);
        response.institution_name = Some(institution_name);
        response
    }
}

impl From<AttendanceRecord> for AttendanceResponse {
    fn from(record: AttendanceRecord) -> Self {
        Self {
            id: record.id,
            student_id: record.student_id,
            student_name: None,
            classroom_id: record.classroom_id,
            classroom_name: None,
            institution_id: record.institution_id,
            institution_name: None,
            attendance_date: record.attendance_date,
            academic_year: record.academic_year,
            attendance_status: record.attendance_status,
            arrival_time: record.arrival_time,
            departure_time: record.departure_time,
            justified: record.justified,
            justification_reason: record.justification_reason,
            justification_document_url: record.justification_document_url,
            registered_by: record.registered_by,
            registered_at: record.registered_at,
            updated_at: record.updated_at,
        }
    }
}

/// Aggregate result of a bulk creation. Partial failure is a success
/// mode: the endpoint always answers 201 with this breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAttendanceResponse {
    pub total_requested: usize,
    pub success_count: usize,
    pub failure_count: usize,
    pub successful_records: Vec<AttendanceResponse>,
    pub failed_records: Vec<FailedRecord>,
}

/// One student whose bulk creation did not go through, and why.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRecord {
    pub student_id: String,
    pub student_name: String,
    pub reason: String,
}

/// `{id, name}` projection for institution reference lists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceDto {
    pub id: Option<String>,
    pub name: String,
}

/// Reference projection carrying the owning institution/classroom ids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedReferenceDto {
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classroom_id: Option<String>,
}

/// Query parameters for date-range endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start_date: Day,
    pub end_date: Day,
}
