//! Integration tests for the projection pipeline
//!
//! Tests are organized by topic:
//! - `estimator` - Blending, alignment and history edge cases
//! - `projection` - End-to-end runs and properties of the percentile output
//! - `sources` - Behaviour of the pipeline around the return source

mod projection;

use crate::history::InMemoryReturnSource;
use crate::model::{
    HistoryWindow, Period, Portfolio, PortfolioComponent, PortfolioStatistics, ProjectionParams,
};

pub(crate) fn period(year: i16, month: i8) -> Period {
    Period::new(year, month).unwrap()
}

/// 2015-01 through 2024-12
pub(crate) fn ten_year_window() -> HistoryWindow {
    HistoryWindow::new(jiff::civil::date(2015, 1, 1), jiff::civil::date(2024, 12, 31))
}

/// Deterministic but non-constant monthly returns around `mean`
pub(crate) fn wavy_returns(
    first: Period,
    months: usize,
    mean: f64,
    amplitude: f64,
) -> Vec<(Period, f64)> {
    let mut out = Vec::with_capacity(months);
    let mut period = first;
    for i in 0..months {
        let offset = match i % 4 {
            0 => amplitude,
            1 => -amplitude,
            2 => 0.5 * amplitude,
            _ => -0.5 * amplitude,
        };
        out.push((period, mean + offset));
        period = period.next().unwrap();
    }
    out
}

pub(crate) fn sample_source() -> InMemoryReturnSource {
    InMemoryReturnSource::new()
        .with_series("IE00B4L5Y983", wavy_returns(period(2015, 1), 120, 0.007, 0.04))
        .with_series("IE00BKM4GZ66", wavy_returns(period(2015, 1), 120, 0.004, 0.06))
}

pub(crate) fn sample_portfolio() -> Portfolio {
    Portfolio::new(vec![
        PortfolioComponent::new("IE00B4L5Y983", 0.7, 0.002),
        PortfolioComponent::new("IE00BKM4GZ66", 0.3, 0.0018),
    ])
}

pub(crate) fn flat_stats(monthly_mean: f64) -> PortfolioStatistics {
    PortfolioStatistics::from_monthly(monthly_mean, 0.0, 0.0, 120)
}

pub(crate) fn seeded(initial_amount: f64, years: u32, simulations: usize) -> ProjectionParams {
    ProjectionParams::new(initial_amount, years, simulations).with_seed(42)
}
