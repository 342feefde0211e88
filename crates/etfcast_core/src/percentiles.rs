//! Percentile aggregation of simulated paths
//!
//! The tracked quantiles sit at -2, -1, 0, +1 and +2 standard deviations of a
//! normal distribution. They are read from the sorted empirical values of each
//! month, not computed from a formula, so they stay ordered even when the
//! simulated distribution is skewed.

use crate::error::ProjectionError;
use crate::model::{FinalValues, MonteCarloResult, PercentileBand, PortfolioStatistics, SimulationRun};

/// Quantiles behind `p5`, `p16`, `p50`, `p84` and `p95`
pub const PROJECTION_PERCENTILES: [f64; 5] = [0.023, 0.159, 0.5, 0.841, 0.977];

/// Nearest-rank value at quantile `p` of an ascending slice.
///
/// Uses index `floor(p * n)` clamped to the last element. Returns `None` for
/// an empty slice.
#[must_use]
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let index = ((p * sorted.len() as f64).floor() as usize).min(sorted.len() - 1);
    Some(sorted[index])
}

/// Sort `values` in place and read the five projection percentiles.
pub fn summarize(values: &mut [f64]) -> Option<[f64; 5]> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable_by(f64::total_cmp);
    let mut out = [0.0; 5];
    for (slot, p) in out.iter_mut().zip(PROJECTION_PERCENTILES) {
        *slot = percentile_of_sorted(values, p)?;
    }
    Some(out)
}

/// Reduce a simulation run to per-month bands for months `0..=forecast_months`.
pub fn percentile_bands(run: &SimulationRun) -> Result<Vec<PercentileBand>, ProjectionError> {
    if run.simulation_count() == 0 || run.forecast_months() == 0 {
        return Err(ProjectionError::EmptySimulation);
    }

    let mut column = Vec::with_capacity(run.simulation_count());
    let mut bands = Vec::with_capacity(run.forecast_months() + 1);
    for month in 0..=run.forecast_months() {
        run.month_values_into(month, &mut column);
        let values = summarize(&mut column).ok_or(ProjectionError::EmptySimulation)?;
        bands.push(PercentileBand::from_array(month, values));
    }
    Ok(bands)
}

/// Build the caller-facing result: chart bands, the unchanged statistics and
/// the labelled final-month values.
pub fn aggregate(
    run: &SimulationRun,
    stats: PortfolioStatistics,
) -> Result<MonteCarloResult, ProjectionError> {
    let chart_data = percentile_bands(run)?;
    let final_values = chart_data
        .last()
        .map(FinalValues::from)
        .ok_or(ProjectionError::EmptySimulation)?;

    Ok(MonteCarloResult {
        chart_data,
        stats,
        final_values,
    })
}
