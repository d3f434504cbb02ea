//! Attendance record lifecycle engine.
//!
//! Validates and applies create/update/justify/delete transitions,
//! orchestrates bulk creation with per-student failure isolation, and
//! computes range statistics. Read paths pass through the
//! [`Enricher`] before results leave the service.

use std::sync::Arc;

use futures::future::join_all;
use uuid::Uuid;

use asistencia_clients::{InstitutionDirectory, StudentDirectory};
use asistencia_core::error::CoreError;
use asistencia_core::stats::AttendanceStats;
use asistencia_core::status::AttendanceStatus;
use asistencia_core::types::{Day, RecordId};
use asistencia_db::models::AttendanceRecord;
use asistencia_db::AttendanceStore;

use crate::dto::{
    AttendanceRequest, AttendanceResponse, BulkAttendanceRequest, BulkAttendanceResponse,
    FailedRecord, JustificationRequest, UpdateAttendanceRequest,
};
use crate::error::{AppError, AppResult, DUPLICATE_RECORD_MSG};
use crate::service::Enricher;

const DEPARTURE_AT_CREATE_MSG: &str =
    "No se puede registrar hora de salida al crear la asistencia";
const DEPARTURE_BEFORE_ARRIVAL_MSG: &str =
    "La hora de salida debe ser posterior a la hora de entrada";
const BULK_DUPLICATE_MSG: &str = "Ya existe un registro de asistencia para esta fecha";

/// Outcome of one student's slot in a bulk creation.
enum BulkOutcome {
    Created(AttendanceRecord),
    Failed(FailedRecord),
}

/// The attendance lifecycle engine.
///
/// Talks to persistence and the registries exclusively through trait
/// seams, so tests can substitute in-memory fakes.
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    students: Arc<dyn StudentDirectory>,
    institutions: Arc<dyn InstitutionDirectory>,
    enricher: Enricher,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        students: Arc<dyn StudentDirectory>,
        institutions: Arc<dyn InstitutionDirectory>,
    ) -> Self {
        let enricher = Enricher::new(Arc::clone(&students), Arc::clone(&institutions));
        Self {
            store,
            students,
            institutions,
            enricher,
        }
    }

    /// The student registry seam (used by the reference endpoints).
    pub fn students(&self) -> &Arc<dyn StudentDirectory> {
        &self.students
    }

    /// The institution registry seam (used by the reference endpoints).
    pub fn institutions(&self) -> &Arc<dyn InstitutionDirectory> {
        &self.institutions
    }

    /// Create one attendance record.
    ///
    /// Fails with 409 when a record already exists for the student and
    /// date, and with 400 when a departure time is supplied (departure
    /// is only ever set via update). Returns the bare, unenriched
    /// record.
    pub async fn create(&self, request: AttendanceRequest) -> AppResult<AttendanceResponse> {
        let count = self
            .store
            .count_by_student_and_date(&request.student_id, request.attendance_date)
            .await?;
        if count > 0 {
            return Err(CoreError::Conflict(DUPLICATE_RECORD_MSG.to_string()).into());
        }

        if request.departure_time.is_some() {
            return Err(CoreError::Validation(DEPARTURE_AT_CREATE_MSG.to_string()).into());
        }

        let now = chrono::Utc::now();
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            student_id: request.student_id,
            classroom_id: request.classroom_id,
            institution_id: request.institution_id,
            attendance_date: request.attendance_date,
            academic_year: request.academic_year,
            attendance_status: request.attendance_status,
            arrival_time: request.arrival_time,
            departure_time: None,
            justified: request.justified.unwrap_or(false),
            justification_reason: request.justification_reason,
            justification_document_url: request.justification_document_url,
            registered_by: request.registered_by,
            registered_at: now,
            updated_at: now,
        };

        let saved = self.store.insert(&record).await?;
        tracing::info!(id = %saved.id, student_id = %saved.student_id, "Attendance record created");
        Ok(AttendanceResponse::from(saved))
    }

    /// Load one record by id, enriched. 404 if absent.
    pub async fn get_by_id(&self, id: RecordId) -> AppResult<AttendanceResponse> {
        let record = self.load(id).await?;
        Ok(self.enricher.enrich(record).await)
    }

    pub async fn get_all(&self) -> AppResult<Vec<AttendanceResponse>> {
        let records = self.store.find_all().await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_student(&self, student_id: &str) -> AppResult<Vec<AttendanceResponse>> {
        let records = self.store.find_by_student(student_id).await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_classroom(
        &self,
        classroom_id: &str,
    ) -> AppResult<Vec<AttendanceResponse>> {
        let records = self.store.find_by_classroom(classroom_id).await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_institution(
        &self,
        institution_id: &str,
    ) -> AppResult<Vec<AttendanceResponse>> {
        let records = self.store.find_by_institution(institution_id).await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_date(&self, date: Day) -> AppResult<Vec<AttendanceResponse>> {
        let records = self.store.find_by_date(date).await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_classroom_and_date(
        &self,
        classroom_id: &str,
        date: Day,
    ) -> AppResult<Vec<AttendanceResponse>> {
        let records = self
            .store
            .find_by_classroom_and_date(classroom_id, date)
            .await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    pub async fn get_by_student_and_date_range(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> AppResult<Vec<AttendanceResponse>> {
        let records = self
            .store
            .find_by_student_and_date_range(student_id, start_date, end_date)
            .await?;
        Ok(self.enricher.enrich_all(records).await)
    }

    /// Update the mutable fields of a record.
    ///
    /// A departure time earlier than the stored arrival time is
    /// rejected; equal times are accepted.
    pub async fn update(
        &self,
        id: RecordId,
        request: UpdateAttendanceRequest,
    ) -> AppResult<AttendanceResponse> {
        let mut existing = self.load(id).await?;

        if let (Some(arrival), Some(departure)) = (existing.arrival_time, request.departure_time) {
            if departure < arrival {
                return Err(
                    CoreError::Validation(DEPARTURE_BEFORE_ARRIVAL_MSG.to_string()).into(),
                );
            }
        }

        existing.attendance_status = request.attendance_status;
        existing.departure_time = request.departure_time;
        existing.justified = request.justified.unwrap_or(existing.justified);
        existing.justification_reason = request.justification_reason;
        existing.justification_document_url = request.justification_document_url;
        existing.updated_at = chrono::Utc::now();

        let saved = self.store.update(&existing).await?;
        Ok(AttendanceResponse::from(saved))
    }

    /// Attach a justification to a record.
    ///
    /// Always sets `justified = true`; an absent record is additionally
    /// moved to `JUSTIFICADO`, other statuses keep their status.
    pub async fn justify(
        &self,
        id: RecordId,
        request: JustificationRequest,
    ) -> AppResult<AttendanceResponse> {
        let mut existing = self.load(id).await?;

        existing.justified = true;
        existing.justification_reason = Some(request.justification_reason);
        existing.justification_document_url = request.justification_document_url;

        if existing.attendance_status == AttendanceStatus::Ausente {
            existing.attendance_status = AttendanceStatus::Justificado;
        }

        existing.updated_at = chrono::Utc::now();

        let saved = self.store.update(&existing).await?;
        tracing::info!(id = %saved.id, "Attendance record justified");
        Ok(AttendanceResponse::from(saved))
    }

    /// Delete a record by id. Repeat deletes report 404.
    pub async fn delete(&self, id: RecordId) -> AppResult<()> {
        let existing = self.load(id).await?;
        let removed = self.store.delete(existing.id).await?;
        if !removed {
            return Err(not_found(id));
        }
        Ok(())
    }

    /// Attendance statistics for one student over an inclusive range.
    ///
    /// The six aggregations are independent store queries executed
    /// concurrently, not derived from one fetched collection.
    pub async fn get_stats(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> AppResult<AttendanceStats> {
        let (total, present, absent, late, justified, permission) = tokio::try_join!(
            self.store
                .count_by_student_and_date_range(student_id, start_date, end_date),
            self.count_status(student_id, AttendanceStatus::Presente, start_date, end_date),
            self.count_status(student_id, AttendanceStatus::Ausente, start_date, end_date),
            self.count_status(student_id, AttendanceStatus::Tardanza, start_date, end_date),
            self.count_status(student_id, AttendanceStatus::Justificado, start_date, end_date),
            self.count_status(student_id, AttendanceStatus::Permiso, start_date, end_date),
        )?;

        Ok(AttendanceStats::from_counts(
            total, present, absent, late, justified, permission,
        ))
    }

    /// Create records for many students in one shot.
    ///
    /// Every student is processed independently and concurrently; a
    /// duplicate or a persistence failure produces a failed entry
    /// without aborting or blocking the rest. The aggregation never
    /// fails wholesale.
    pub async fn create_bulk(
        &self,
        request: BulkAttendanceRequest,
    ) -> AppResult<BulkAttendanceResponse> {
        let total_requested = request.student_ids.len();
        tracing::info!(count = total_requested, "Creating bulk attendance");

        let outcomes = join_all(
            request
                .student_ids
                .iter()
                .map(|student_id| self.create_one_of_bulk(student_id, &request)),
        )
        .await;

        let mut successful_records = Vec::new();
        let mut failed_records = Vec::new();
        for outcome in outcomes {
            match outcome {
                BulkOutcome::Created(record) => {
                    successful_records.push(AttendanceResponse::from(record))
                }
                BulkOutcome::Failed(failed) => failed_records.push(failed),
            }
        }

        Ok(BulkAttendanceResponse {
            total_requested,
            success_count: successful_records.len(),
            failure_count: failed_records.len(),
            successful_records,
            failed_records,
        })
    }

    /// One student's slot of a bulk creation. Infallible by design:
    /// every failure path becomes a [`FailedRecord`].
    async fn create_one_of_bulk(
        &self,
        student_id: &str,
        request: &BulkAttendanceRequest,
    ) -> BulkOutcome {
        let count = match self
            .store
            .count_by_student_and_date(student_id, request.attendance_date)
            .await
        {
            Ok(count) => count,
            Err(err) => {
                tracing::error!(error = %err, student_id, "Bulk duplicate check failed");
                return BulkOutcome::Failed(
                    self.failed_record(student_id, format!("Error al guardar: {err}"))
                        .await,
                );
            }
        };

        if count > 0 {
            return BulkOutcome::Failed(
                self.failed_record(student_id, BULK_DUPLICATE_MSG.to_string())
                    .await,
            );
        }

        let now = chrono::Utc::now();
        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            classroom_id: request.classroom_id.clone(),
            institution_id: request.institution_id.clone(),
            attendance_date: request.attendance_date,
            academic_year: request.academic_year,
            attendance_status: request.attendance_status,
            arrival_time: Some(request.arrival_time),
            departure_time: None,
            justified: false,
            justification_reason: None,
            justification_document_url: None,
            registered_by: request.registered_by.clone(),
            registered_at: now,
            updated_at: now,
        };

        match self.store.insert(&record).await {
            Ok(saved) => BulkOutcome::Created(saved),
            Err(err) => {
                tracing::error!(error = %err, student_id, "Bulk insert failed");
                // A unique violation here means the check-then-insert
                // race lost; report it like the fast-path duplicate.
                let reason = if err.is_unique_violation() {
                    BULK_DUPLICATE_MSG.to_string()
                } else {
                    format!("Error al guardar: {err}")
                };
                BulkOutcome::Failed(self.failed_record(student_id, reason).await)
            }
        }
    }

    /// Build a failed entry, resolving the student's display name for
    /// the report (or "Desconocido" when the registry has nothing).
    async fn failed_record(&self, student_id: &str, reason: String) -> FailedRecord {
        let student_name = match self.students.student_by_id(student_id).await {
            Ok(Some(student)) => student.display_name(),
            _ => "Desconocido".to_string(),
        };
        FailedRecord {
            student_id: student_id.to_string(),
            student_name,
            reason,
        }
    }

    async fn count_status(
        &self,
        student_id: &str,
        status: AttendanceStatus,
        start_date: Day,
        end_date: Day,
    ) -> Result<i64, asistencia_db::StoreError> {
        self.store
            .count_by_student_and_status_and_date_range(student_id, status, start_date, end_date)
            .await
    }

    async fn load(&self, id: RecordId) -> AppResult<AttendanceRecord> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: RecordId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "AttendanceRecord",
        id,
    })
}
