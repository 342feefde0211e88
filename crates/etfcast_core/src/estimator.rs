//! Historical statistics estimation
//!
//! Turns a portfolio and a date window into the monthly mean and standard
//! deviation that drive the simulator.

use crate::error::{InputError, ProjectionError};
use crate::history::ReturnSource;
use crate::model::{HistoryWindow, Period, Portfolio, PortfolioStatistics, ReturnSeries};

/// Arithmetic mean and sample standard deviation (`n - 1` denominator).
///
/// Returns `None` for fewer than two values.
#[must_use]
pub fn sample_moments(values: &[f64]) -> Option<(f64, f64)> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance.sqrt()))
}

/// Weighted sum of the components' net returns, one value per aligned period.
///
/// Every series must be strictly ordered and share exactly the periods of the
/// first one.
fn blend(portfolio: &Portfolio, series: &[ReturnSeries]) -> Result<Vec<f64>, ProjectionError> {
    let Some(reference) = series.first() else {
        return Err(InputError::EmptyPortfolio.into());
    };

    for (component, s) in portfolio.iter().zip(series) {
        if let Some(period) = s.first_unordered_period() {
            return Err(ProjectionError::UnorderedHistory {
                instrument: component.instrument_id.clone(),
                period,
            });
        }
        if let Some(period) = first_mismatch(reference, s) {
            return Err(ProjectionError::MisalignedHistory {
                instrument: component.instrument_id.clone(),
                period,
            });
        }
    }

    let mut blended = vec![0.0; reference.len()];
    for (component, s) in portfolio.iter().zip(series) {
        let drag = component.monthly_expense();
        for (acc, value) in blended.iter_mut().zip(s.values()) {
            *acc += component.weight * (value - drag);
        }
    }
    Ok(blended)
}

/// First period present in one series but not at the same position in the other.
fn first_mismatch(a: &ReturnSeries, b: &ReturnSeries) -> Option<Period> {
    let mismatch = a
        .periods()
        .zip(b.periods())
        .find(|(pa, pb)| pa != pb)
        .map(|(pa, pb)| pa.min(pb));
    if mismatch.is_some() {
        return mismatch;
    }
    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => b.points.get(a.len()).map(|p| p.period),
        std::cmp::Ordering::Greater => a.points.get(b.len()).map(|p| p.period),
        std::cmp::Ordering::Equal => None,
    }
}

fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, ProjectionError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ProjectionError::NumericalDegeneracy { quantity, value })
    }
}

/// Compute blended statistics from series already fetched for each component.
///
/// `series[i]` belongs to `portfolio.components()[i]`. `initial_amount` only
/// feeds `current_value`.
pub fn statistics_from_series(
    portfolio: &Portfolio,
    series: &[ReturnSeries],
    initial_amount: f64,
) -> Result<PortfolioStatistics, ProjectionError> {
    if portfolio.is_empty() {
        return Err(InputError::EmptyPortfolio.into());
    }
    if let Some(component) = portfolio.components().get(series.len()) {
        return Err(ProjectionError::MissingHistory {
            instrument: component.instrument_id.clone(),
        });
    }
    for (component, s) in portfolio.iter().zip(series) {
        if s.is_empty() {
            return Err(ProjectionError::MissingHistory {
                instrument: component.instrument_id.clone(),
            });
        }
    }

    let blended = blend(portfolio, series)?;
    let (mean, std_dev) = sample_moments(&blended).ok_or(ProjectionError::InsufficientHistory {
        periods: blended.len(),
    })?;

    let monthly_mean = ensure_finite("monthly mean", mean)?;
    let monthly_std_dev = ensure_finite("monthly standard deviation", std_dev)?;
    let growth: f64 = blended.iter().map(|r| 1.0 + r).product();
    let current_value = ensure_finite("current value", initial_amount * growth)?;

    Ok(PortfolioStatistics::from_monthly(
        monthly_mean,
        monthly_std_dev,
        current_value,
        blended.len(),
    ))
}

/// Fetch every component's history from `source` and estimate the blended statistics.
///
/// Missing history for any component, fewer than two aligned periods and
/// non-finite moments are all errors; nothing is defaulted to zero.
pub fn estimate_statistics<S: ReturnSource + ?Sized>(
    portfolio: &Portfolio,
    window: &HistoryWindow,
    initial_amount: f64,
    source: &S,
) -> Result<PortfolioStatistics, ProjectionError> {
    if portfolio.is_empty() {
        return Err(InputError::EmptyPortfolio.into());
    }

    let mut series = Vec::with_capacity(portfolio.len());
    for component in portfolio.iter() {
        let s = source.monthly_returns(&component.instrument_id, window.start, window.end)?;
        tracing::debug!(
            instrument = %component.instrument_id,
            periods = s.len(),
            "loaded historical returns"
        );
        if s.is_empty() {
            return Err(ProjectionError::MissingHistory {
                instrument: component.instrument_id.clone(),
            });
        }
        series.push(s);
    }

    let stats = statistics_from_series(portfolio, &series, initial_amount)?;
    tracing::debug!(
        periods = stats.periods,
        monthly_mean = stats.monthly_mean,
        monthly_std_dev = stats.monthly_std_dev,
        "estimated portfolio statistics"
    );
    Ok(stats)
}
