//! Attendance statistics aggregated over a date range.

use serde::Serialize;

/// Per-status counts and the derived attendance rate for one student
/// over an inclusive date range.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    pub total_records: i64,
    pub present_count: i64,
    pub absent_count: i64,
    pub late_count: i64,
    pub justified_count: i64,
    pub permission_count: i64,
    pub attendance_rate: f64,
}

impl AttendanceStats {
    /// Build stats from raw counts.
    ///
    /// The rate counts both on-time and late arrivals as attended:
    /// `(present + late) * 100 / total`, or exactly `0.0` for an empty
    /// range.
    pub fn from_counts(
        total: i64,
        present: i64,
        absent: i64,
        late: i64,
        justified: i64,
        permission: i64,
    ) -> Self {
        let attendance_rate = if total > 0 {
            (present + late) as f64 * 100.0 / total as f64
        } else {
            0.0
        };

        Self {
            total_records: total,
            present_count: present,
            absent_count: absent,
            late_count: late,
            justified_count: justified,
            permission_count: permission,
            attendance_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_counts_present_and_late() {
        let stats = AttendanceStats::from_counts(10, 6, 2, 2, 0, 0);
        assert_eq!(stats.attendance_rate, 80.0);
    }

    #[test]
    fn empty_range_has_zero_rate() {
        let stats = AttendanceStats::from_counts(0, 0, 0, 0, 0, 0);
        assert_eq!(stats.attendance_rate, 0.0);
    }

    #[test]
    fn full_attendance_is_one_hundred() {
        let stats = AttendanceStats::from_counts(5, 5, 0, 0, 0, 0);
        assert_eq!(stats.attendance_rate, 100.0);
    }
}
