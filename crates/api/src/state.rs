use std::sync::Arc;

use crate::config::ServerConfig;
use crate::service::AttendanceService;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (used directly by the health check).
    pub pool: asistencia_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The attendance lifecycle engine.
    pub service: Arc<AttendanceService>,
}
