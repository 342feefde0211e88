pub mod index_handlers;
pub mod projection_handlers;

pub use index_handlers::*;
pub use projection_handlers::*;

use std::time::Duration;

use etfcast_core::model::SimulationLimits;

use crate::db::DbConn;

/// Shared state of every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: DbConn,
    pub limits: SimulationLimits,
    /// Upper bound on one projection request
    pub timeout: Duration,
}
