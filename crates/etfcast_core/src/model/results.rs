//! Simulation output types
//!
//! `SimulationRun` is the raw path matrix of one Monte Carlo execution and
//! never leaves the pipeline. `MonteCarloResult` is what callers receive.

use serde::{Deserialize, Serialize};

use super::PortfolioStatistics;

/// Dense `simulation_count x forecast_months` matrix of simulated values.
///
/// Stored path-major: month `m` (1-based) of path `p` lives at
/// `p * forecast_months + (m - 1)`. Month 0 is not stored; it is always
/// `initial_amount`.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    simulation_count: usize,
    forecast_months: usize,
    initial_amount: f64,
    values: Vec<f64>,
}

impl SimulationRun {
    /// Wrap an already filled matrix. Returns `None` if `values` does not
    /// hold exactly `simulation_count * forecast_months` entries.
    #[must_use]
    pub fn from_values(
        simulation_count: usize,
        forecast_months: usize,
        initial_amount: f64,
        values: Vec<f64>,
    ) -> Option<Self> {
        if simulation_count.checked_mul(forecast_months)? != values.len() {
            return None;
        }
        Some(Self {
            simulation_count,
            forecast_months,
            initial_amount,
            values,
        })
    }

    #[must_use]
    pub fn simulation_count(&self) -> usize {
        self.simulation_count
    }

    #[must_use]
    pub fn forecast_months(&self) -> usize {
        self.forecast_months
    }

    #[must_use]
    pub fn initial_amount(&self) -> f64 {
        self.initial_amount
    }

    /// Values of one path for months `1..=forecast_months`.
    #[must_use]
    pub fn path(&self, index: usize) -> Option<&[f64]> {
        if index >= self.simulation_count {
            return None;
        }
        let start = index * self.forecast_months;
        Some(&self.values[start..start + self.forecast_months])
    }

    pub fn paths(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.forecast_months.max(1))
    }

    /// Copy every path's value at `month` into `out`, replacing its contents.
    pub fn month_values_into(&self, month: usize, out: &mut Vec<f64>) {
        out.clear();
        if month == 0 {
            out.resize(self.simulation_count, self.initial_amount);
            return;
        }
        if month > self.forecast_months {
            return;
        }
        out.extend(self.paths().map(|path| path[month - 1]));
    }
}

/// The five tracked percentiles of the simulated value distribution at one month.
///
/// `p5`/`p95` are the 2.3% and 97.7% points (about -2 and +2 sigma) and
/// `p16`/`p84` the 15.9% and 84.1% points. The wire names follow the charting
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileBand {
    pub month: usize,
    #[serde(rename = "percentile5")]
    pub p5: f64,
    #[serde(rename = "percentile16")]
    pub p16: f64,
    #[serde(rename = "percentile50")]
    pub p50: f64,
    #[serde(rename = "percentile84")]
    pub p84: f64,
    #[serde(rename = "percentile95")]
    pub p95: f64,
}

impl PercentileBand {
    #[must_use]
    pub fn from_array(month: usize, values: [f64; 5]) -> Self {
        let [p5, p16, p50, p84, p95] = values;
        Self {
            month,
            p5,
            p16,
            p50,
            p84,
            p95,
        }
    }

    #[must_use]
    pub fn to_array(&self) -> [f64; 5] {
        [self.p5, self.p16, self.p50, self.p84, self.p95]
    }

    /// True when every band is at least the one below it.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.to_array().windows(2).all(|w| w[0] <= w[1])
    }
}

/// Percentiles at the final forecast month under their narrative labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalValues {
    pub very_bad: f64,
    pub bad: f64,
    pub average: f64,
    pub good: f64,
    pub great: f64,
}

impl From<&PercentileBand> for FinalValues {
    fn from(band: &PercentileBand) -> Self {
        Self {
            very_bad: band.p5,
            bad: band.p16,
            average: band.p50,
            good: band.p84,
            great: band.p95,
        }
    }
}

/// Output of one projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloResult {
    /// One entry per month `0..=forecast_months`, ascending
    pub chart_data: Vec<PercentileBand>,
    pub stats: PortfolioStatistics,
    pub final_values: FinalValues,
}

impl MonteCarloResult {
    #[must_use]
    pub fn forecast_months(&self) -> usize {
        self.chart_data.len().saturating_sub(1)
    }
}
