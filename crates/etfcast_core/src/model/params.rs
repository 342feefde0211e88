//! Request-side types for one projection

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

use super::Portfolio;

fn default_forecast_years() -> u32 {
    10
}

fn default_simulations() -> usize {
    600
}

/// Inclusive calendar bounds of the historical estimation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    pub start: Date,
    pub end: Date,
}

impl HistoryWindow {
    #[must_use]
    pub fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionParams {
    /// Starting capital; month 0 of every path
    pub initial_amount: f64,
    #[serde(default = "default_forecast_years")]
    pub forecast_years: u32,
    #[serde(default = "default_simulations")]
    pub simulations: usize,
    /// Fixed seed for reproducible runs. Drawn from OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Clamp simulated values at zero after each month
    #[serde(default)]
    pub floor_at_zero: bool,
}

impl ProjectionParams {
    #[must_use]
    pub fn new(initial_amount: f64, forecast_years: u32, simulations: usize) -> Self {
        Self {
            initial_amount,
            forecast_years,
            simulations,
            seed: None,
            floor_at_zero: false,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_floor_at_zero(mut self, floor: bool) -> Self {
        self.floor_at_zero = floor;
        self
    }

    #[must_use]
    pub fn forecast_months(&self) -> usize {
        self.forecast_years as usize * 12
    }
}

/// Hard ceilings protecting memory and CPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationLimits {
    pub max_simulations: usize,
    pub max_forecast_months: usize,
}

impl SimulationLimits {
    pub const DEFAULT_MAX_SIMULATIONS: usize = 10_000;
    pub const DEFAULT_MAX_FORECAST_MONTHS: usize = 100 * 12;
}

impl Default for SimulationLimits {
    fn default() -> Self {
        Self {
            max_simulations: Self::DEFAULT_MAX_SIMULATIONS,
            max_forecast_months: Self::DEFAULT_MAX_FORECAST_MONTHS,
        }
    }
}

/// Everything needed for one run of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub portfolio: Portfolio,
    pub window: HistoryWindow,
    pub params: ProjectionParams,
}

impl ProjectionRequest {
    #[must_use]
    pub fn new(portfolio: Portfolio, window: HistoryWindow, params: ProjectionParams) -> Self {
        Self {
            portfolio,
            window,
            params,
        }
    }
}
