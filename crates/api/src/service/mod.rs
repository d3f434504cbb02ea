pub mod attendance;
pub mod enrichment;

pub use attendance::AttendanceService;
pub use enrichment::Enricher;
