//! HTTP clients for the student and institution/classroom registries.
//!
//! Both registries answer with a `{success, message, data}` envelope
//! where `data` may be a single object or an array; [`envelope`]
//! normalizes either shape into a list. The registries are also
//! inconsistent about which name fields they populate, so each DTO
//! resolves its display name from a fixed priority order.

use std::time::Duration;

pub mod envelope;
pub mod institution;
pub mod student;

pub use institution::{ClassroomDto, InstitutionClient, InstitutionDirectory, InstitutionDto};
pub use student::{StudentClient, StudentDirectory, StudentDto};

/// Per-request timeout for registry lookups.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from the registry HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The registry returned a non-2xx status code.
    #[error("reference service error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

/// A trimmed, non-empty view of an optional string field.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// First eight characters of an identifier, for coded display fallbacks.
pub(crate) fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}
