//! Attendance record row model.

use serde::Serialize;
use sqlx::FromRow;

use asistencia_core::status::AttendanceStatus;
use asistencia_core::types::{Day, RecordId, TimeOfDay, Timestamp};

/// A row from the `attendance_records` table.
///
/// One record exists per (student, attendance date) pair. `registered_at`
/// is immutable after creation; `updated_at` moves on every mutation.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub student_id: String,
    pub classroom_id: String,
    pub institution_id: String,
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
