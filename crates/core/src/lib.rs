//! Domain types shared by every crate in the attendance service.

pub mod error;
pub mod stats;
pub mod status;
pub mod types;
