//! Abstract persistence boundary for attendance records.
//!
//! [`AttendanceStore`] is the seam the lifecycle service talks to; the
//! production implementation is [`PgAttendanceStore`]. Tests substitute
//! an in-memory fake behind the same trait.

use async_trait::async_trait;
use sqlx::PgPool;

use asistencia_core::status::AttendanceStatus;
use asistencia_core::types::{Day, RecordId};

use crate::models::AttendanceRecord;

/// Errors reported by an attendance store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// Used by non-database store implementations (and test fakes) to
    /// report a backend failure.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this error is a violation of the
    /// `uq_attendance_student_date` unique constraint (the duplicate
    /// student/date backstop).
    pub fn is_unique_violation(&self) -> bool {
        match self {
            StoreError::Database(sqlx::Error::Database(db_err)) => {
                // PostgreSQL unique violation: error code 23505.
                db_err.code().as_deref() == Some("23505")
                    && db_err.constraint().is_some_and(|c| c.starts_with("uq_"))
            }
            _ => false,
        }
    }
}

/// Persistence operations for attendance records.
///
/// All date-range queries are inclusive of both bounds.
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn insert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    /// Persist the mutable fields of an already-existing record.
    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError>;

    async fn find_by_id(&self, id: RecordId) -> Result<Option<AttendanceRecord>, StoreError>;

    async fn find_all(&self) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_student(&self, student_id: &str)
        -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_classroom(
        &self,
        classroom_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_date(&self, date: Day) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_classroom_and_date(
        &self,
        classroom_id: &str,
        date: Day,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn find_by_student_and_date_range(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> Result<Vec<AttendanceRecord>, StoreError>;

    /// Delete by id. Returns `true` if a row was removed.
    async fn delete(&self, id: RecordId) -> Result<bool, StoreError>;

    async fn count_by_student_and_date(
        &self,
        student_id: &str,
        date: Day,
    ) -> Result<i64, StoreError>;

    async fn count_by_student_and_date_range(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> Result<i64, StoreError>;

    async fn count_by_student_and_status_and_date_range(
        &self,
        student_id: &str,
        status: AttendanceStatus,
        start_date: Day,
        end_date: Day,
    ) -> Result<i64, StoreError>;
}

/// Column list for `attendance_records` queries.
const COLUMNS: &str = "id, student_id, classroom_id, institution_id, attendance_date, \
     academic_year, attendance_status, arrival_time, departure_time, justified, \
     justification_reason, justification_document_url, registered_by, registered_at, updated_at";

/// Postgres-backed [`AttendanceStore`].
pub struct PgAttendanceStore {
    pool: PgPool,
}

impl PgAttendanceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for PgAttendanceStore {
    async fn insert(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        let query = format!(
            "INSERT INTO attendance_records ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(record.id)
            .bind(&record.student_id)
            .bind(&record.classroom_id)
            .bind(&record.institution_id)
            .bind(record.attendance_date)
            .bind(record.academic_year)
            .bind(record.attendance_status)
            .bind(record.arrival_time)
            .bind(record.departure_time)
            .bind(record.justified)
            .bind(&record.justification_reason)
            .bind(&record.justification_document_url)
            .bind(&record.registered_by)
            .bind(record.registered_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(inserted)
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<AttendanceRecord, StoreError> {
        // Identifiers, date and academic year are immutable post-creation,
        // so only the lifecycle fields are written.
        let query = format!(
            "UPDATE attendance_records \
             SET attendance_status = $2, departure_time = $3, justified = $4, \
                 justification_reason = $5, justification_document_url = $6, updated_at = $7 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(record.id)
            .bind(record.attendance_status)
            .bind(record.departure_time)
            .bind(record.justified)
            .bind(&record.justification_reason)
            .bind(&record.justification_document_url)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn find_by_id(&self, id: RecordId) -> Result<Option<AttendanceRecord>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM attendance_records WHERE id = $1");
        let record = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn find_all(&self) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records ORDER BY attendance_date DESC, registered_at DESC"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_student(
        &self,
        student_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE student_id = $1 ORDER BY attendance_date DESC"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(student_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_classroom(
        &self,
        classroom_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE classroom_id = $1 ORDER BY attendance_date DESC"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(classroom_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_institution(
        &self,
        institution_id: &str,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE institution_id = $1 ORDER BY attendance_date DESC"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(institution_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_date(&self, date: Day) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE attendance_date = $1 ORDER BY registered_at"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_classroom_and_date(
        &self,
        classroom_id: &str,
        date: Day,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE classroom_id = $1 AND attendance_date = $2 ORDER BY registered_at"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(classroom_id)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn find_by_student_and_date_range(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> Result<Vec<AttendanceRecord>, StoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance_records \
             WHERE student_id = $1 AND attendance_date BETWEEN $2 AND $3 \
             ORDER BY attendance_date"
        );
        let records = sqlx::query_as::<_, AttendanceRecord>(&query)
            .bind(student_id)
            .bind(start_date)
            .bind(end_date)
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn delete(&self, id: RecordId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM attendance_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_student_and_date(
        &self,
        student_id: &str,
        date: Day,
    ) -> Result<i64, StoreError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records \
             WHERE student_id = $1 AND attendance_date = $2",
        )
        .bind(student_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    async fn count_by_student_and_date_range(
        &self,
        student_id: &str,
        start_date: Day,
        end_date: Day,
    ) -> Result<i64, StoreError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records \
             WHERE student_id = $1 AND attendance_date BETWEEN $2 AND $3",
        )
        .bind(student_id)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    async fn count_by_student_and_status_and_date_range(
        &self,
        student_id: &str,
        status: AttendanceStatus,
        start_date: Day,
        end_date: Day,
    ) -> Result<i64, StoreError> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM attendance_records \
             WHERE student_id = $1 AND attendance_status = $2 \
             AND attendance_date BETWEEN $3 AND $4",
        )
        .bind(student_id)
        .bind(status)
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
