//! ETF portfolio Monte Carlo projection library
//!
//! This crate estimates the monthly return distribution of a weighted basket
//! of funds from historical data and projects future portfolio value with a
//! Monte Carlo simulation. It provides:
//! - Historical statistics (blended, expense-adjusted monthly mean and std dev)
//! - Seeded, optionally parallel path simulation with i.i.d. normal returns
//! - Percentile bands (2.3 / 15.9 / 50 / 84.1 / 97.7 %) for every forecast month
//!
//! # Example
//!
//! ```ignore
//! use etfcast_core::history::InMemoryReturnSource;
//! use etfcast_core::model::*;
//! use etfcast_core::projection::run_projection;
//!
//! let source = InMemoryReturnSource::new().with_series("IE00B4L5Y983", returns);
//! let request = ProjectionRequest::new(
//!     Portfolio::single("IE00B4L5Y983", 0.002),
//!     HistoryWindow::new(jiff::civil::date(2015, 1, 1), jiff::civil::date(2024, 12, 31)),
//!     ProjectionParams::new(500_000.0, 10, 600).with_seed(42),
//! );
//! let result = run_projection(&request, &source, &SimulationLimits::default())?;
//! println!("median after 10 years: {}", result.final_values.average);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Pipeline stages
// ============================================================================

pub mod estimator;
pub mod history;
pub mod percentiles;
pub mod projection;
pub mod simulation;
pub mod validation;

// ============================================================================
// Types and errors
// ============================================================================

pub mod error;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ErrorCategory, InputError, ProjectionError, SourceError};
pub use history::{InMemoryReturnSource, ReturnSource};
pub use projection::{project_from_statistics, project_with_rng, run_projection};
