/// Attendance records are keyed by UUID, generated at insert time.
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date without a time zone (the attendance day).
pub type Day = chrono::NaiveDate;

/// Wall-clock time of day (arrival / departure).
pub type TimeOfDay = chrono::NaiveTime;
