//! Enrichment of attendance records with resolved display names.
//!
//! Each record needs three independent registry lookups (student,
//! classroom, institution). The lookups run concurrently and are joined
//! before a result is produced; any branch that fails, times out or
//! comes back empty contributes its sentinel instead. A registry outage
//! therefore degrades the names, never the read operation.

use std::sync::Arc;

use futures::future::join_all;

use asistencia_clients::{InstitutionDirectory, StudentDirectory};
use asistencia_db::models::AttendanceRecord;

use crate::dto::AttendanceResponse;

/// Sentinel shown when the student lookup yields nothing.
pub const STUDENT_NAME_UNAVAILABLE: &str = "Nombre no disponible";
/// Sentinel shown when the classroom lookup yields nothing.
pub const CLASSROOM_NAME_UNAVAILABLE: &str = "Aula no disponible";
/// Sentinel shown when the institution lookup yields nothing.
pub const INSTITUTION_NAME_UNAVAILABLE: &str = "Institución no disponible";

/// Resolves display names for attendance records.
pub struct Enricher {
    students: Arc<dyn StudentDirectory>,
    institutions: Arc<dyn InstitutionDirectory>,
}

impl Enricher {
    pub fn new(
        students: Arc<dyn StudentDirectory>,
        institutions: Arc<dyn InstitutionDirectory>,
    ) -> Self {
        Self {
            students,
            institutions,
        }
    }

    /// Enrich one record. Never fails; missing names become sentinels.
    pub async fn enrich(&self, record: AttendanceRecord) -> AttendanceResponse {
        let (student_name, classroom_name, institution_name) = tokio::join!(
            self.student_name(&record.student_id),
            self.classroom_name(&record.classroom_id),
            self.institution_name(&record.institution_id),
        );
        AttendanceResponse::enriched(record, student_name, classroom_name, institution_name)
    }

    /// Enrich a list of records; each record's three lookups run
    /// concurrently, and records are enriched concurrently with each
    /// other. Input order is preserved.
    pub async fn enrich_all(&self, records: Vec<AttendanceRecord>) -> Vec<AttendanceResponse> {
        join_all(records.into_iter().map(|record| self.enrich(record))).await
    }

    async fn student_name(&self, student_id: &str) -> String {
        match self.students.student_by_id(student_id).await {
            Ok(Some(student)) => student.display_name(),
            Ok(None) => STUDENT_NAME_UNAVAILABLE.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, student_id, "Student lookup failed");
                STUDENT_NAME_UNAVAILABLE.to_string()
            }
        }
    }

    async fn classroom_name(&self, classroom_id: &str) -> String {
        match self.institutions.classroom_by_id(classroom_id).await {
            Ok(Some(classroom)) => classroom.display_name(),
            Ok(None) => CLASSROOM_NAME_UNAVAILABLE.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, classroom_id, "Classroom lookup failed");
                CLASSROOM_NAME_UNAVAILABLE.to_string()
            }
        }
    }

    async fn institution_name(&self, institution_id: &str) -> String {
        match self.institutions.institution_by_id(institution_id).await {
            Ok(Some(institution)) => institution.display_name(),
            Ok(None) => INSTITUTION_NAME_UNAVAILABLE.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, institution_id, "Institution lookup failed");
                INSTITUTION_NAME_UNAVAILABLE.to_string()
            }
        }
    }
}
