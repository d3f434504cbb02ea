//! Attendance status enumeration.
//!
//! Stored in Postgres as the `attendance_status` enum and serialized on
//! the wire as the upstream Spanish codes (`PRESENTE`, `AUSENTE`, ...).

use serde::{Deserialize, Serialize};

/// Status of a single attendance record.
///
/// No transition graph is enforced between statuses; the only automatic
/// coupling is `Ausente` -> `Justificado` when a justification is
/// applied to an absent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "attendance_status", rename_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Presente,
    Ausente,
    Tardanza,
    Justificado,
    Permiso,
}

impl AttendanceStatus {
    /// Wire / database code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Presente => "PRESENTE",
            AttendanceStatus::Ausente => "AUSENTE",
            AttendanceStatus::Tardanza => "TARDANZA",
            AttendanceStatus::Justificado => "JUSTIFICADO",
            AttendanceStatus::Permiso => "PERMISO",
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_upstream_codes() {
        let json = serde_json::to_string(&AttendanceStatus::Tardanza).unwrap();
        assert_eq!(json, "\"TARDANZA\"");
    }

    #[test]
    fn deserializes_from_upstream_codes() {
        let status: AttendanceStatus = serde_json::from_str("\"AUSENTE\"").unwrap();
        assert_eq!(status, AttendanceStatus::Ausente);
    }

    #[test]
    fn rejects_unknown_codes() {
        let result = serde_json::from_str::<AttendanceStatus>("\"FALTA\"");
        assert!(result.is_err());
    }

    #[test]
    fn display_matches_wire_code() {
        assert_eq!(AttendanceStatus::Justificado.to_string(), "JUSTIFICADO");
    }
}
