//! Historical return data
//!
//! The estimator reads per-instrument monthly returns through the narrow
//! [`ReturnSource`] interface. Stores that keep daily index closes can
//! convert them with [`monthly_returns_from_prices`].

use std::collections::BTreeMap;

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::error::SourceError;
use crate::model::{MonthlyReturn, Period, ReturnSeries};

/// Read access to historical monthly returns.
///
/// Implementations return the months whose period lies within
/// `Period::of(start)..=Period::of(end)`, ascending. An instrument without
/// data in range yields an empty series; the estimator decides whether that
/// is fatal.
pub trait ReturnSource {
    fn monthly_returns(
        &self,
        instrument_id: &str,
        start: Date,
        end: Date,
    ) -> Result<ReturnSeries, SourceError>;
}

impl<T: ReturnSource + ?Sized> ReturnSource for &T {
    fn monthly_returns(
        &self,
        instrument_id: &str,
        start: Date,
        end: Date,
    ) -> Result<ReturnSeries, SourceError> {
        (**self).monthly_returns(instrument_id, start, end)
    }
}

/// Keep only the points whose period falls inside the inclusive date window.
pub fn clip_to_window(points: &[MonthlyReturn], start: Date, end: Date) -> ReturnSeries {
    let (first, last) = (Period::of(start), Period::of(end));
    points
        .iter()
        .filter(|p| p.period >= first && p.period <= last)
        .copied()
        .collect()
}

/// Return series held in memory, keyed by instrument identifier
#[derive(Debug, Clone, Default)]
pub struct InMemoryReturnSource {
    series: FxHashMap<String, Vec<MonthlyReturn>>,
}

impl InMemoryReturnSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with_series(
        mut self,
        instrument_id: impl Into<String>,
        returns: impl IntoIterator<Item = (Period, f64)>,
    ) -> Self {
        self.insert(instrument_id, returns);
        self
    }

    /// Store a series, replacing any previous one for the instrument.
    /// Points are kept in the order given.
    pub fn insert(
        &mut self,
        instrument_id: impl Into<String>,
        returns: impl IntoIterator<Item = (Period, f64)>,
    ) {
        let points = returns
            .into_iter()
            .map(|(period, value)| MonthlyReturn::new(period, value))
            .collect();
        self.series.insert(instrument_id.into(), points);
    }

    /// A constant return `rate` for every month from `first` through `last`.
    pub fn insert_constant(
        &mut self,
        instrument_id: impl Into<String>,
        first: Period,
        last: Period,
        rate: f64,
    ) {
        let mut points = Vec::new();
        let mut period = first;
        while period <= last {
            points.push((period, rate));
            match period.next() {
                Some(next) => period = next,
                None => break,
            }
        }
        self.insert(instrument_id, points);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl ReturnSource for InMemoryReturnSource {
    fn monthly_returns(
        &self,
        instrument_id: &str,
        start: Date,
        end: Date,
    ) -> Result<ReturnSeries, SourceError> {
        Ok(self
            .series
            .get(instrument_id)
            .map(|points| clip_to_window(points, start, end))
            .unwrap_or_default())
    }
}

/// Convert daily closing prices into month-over-month returns.
///
/// The last close of each calendar month is that month's value; the return
/// for month `k` is `close[k] / close[k - 1] - 1`, so the first month in the
/// input produces no return. Input order does not matter. Prices that are
/// zero, negative or not finite are rejected.
pub fn monthly_returns_from_prices(
    instrument_id: &str,
    prices: &[(Date, f64)],
) -> Result<ReturnSeries, SourceError> {
    let mut month_end: BTreeMap<Period, (Date, f64)> = BTreeMap::new();

    for &(date, price) in prices {
        if !price.is_finite() || price <= 0.0 {
            return Err(SourceError::InvalidPrice {
                instrument: instrument_id.to_string(),
                date,
                price,
            });
        }
        let entry = month_end.entry(Period::of(date)).or_insert((date, price));
        if date >= entry.0 {
            *entry = (date, price);
        }
    }

    Ok(month_end
        .iter()
        .zip(month_end.iter().skip(1))
        .map(|((_, (_, prev)), (period, (_, close)))| MonthlyReturn::new(*period, close / prev - 1.0))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn period(year: i16, month: i8) -> Period {
        Period::new(year, month).unwrap()
    }

    #[test]
    fn test_in_memory_clips_to_window() {
        let mut source = InMemoryReturnSource::new();
        source.insert_constant("SPX", period(2020, 1), period(2020, 12), 0.01);

        let series = source
            .monthly_returns("SPX", date(2020, 3, 15), date(2020, 6, 1))
            .unwrap();
        let periods: Vec<_> = series.periods().collect();
        assert_eq!(
            periods,
            vec![period(2020, 3), period(2020, 4), period(2020, 5), period(2020, 6)]
        );
    }

    #[test]
    fn test_in_memory_unknown_instrument_is_empty() {
        let source = InMemoryReturnSource::new();
        let series = source
            .monthly_returns("MISSING", date(2020, 1, 1), date(2021, 1, 1))
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_monthly_returns_from_prices_uses_month_end_close() {
        let prices = vec![
            (date(2024, 1, 2), 95.0),
            (date(2024, 1, 31), 100.0),
            (date(2024, 2, 15), 104.0),
            (date(2024, 2, 29), 110.0),
            (date(2024, 3, 28), 99.0),
        ];
        let series = monthly_returns_from_prices("SPX", &prices).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].period, period(2024, 2));
        assert!((series.points[0].value - 0.10).abs() < 1e-12);
        assert_eq!(series.points[1].period, period(2024, 3));
        assert!((series.points[1].value - (99.0 / 110.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_monthly_returns_from_prices_ignores_input_order() {
        let ordered = vec![
            (date(2024, 1, 31), 100.0),
            (date(2024, 2, 29), 110.0),
            (date(2024, 3, 29), 121.0),
        ];
        let mut shuffled = ordered.clone();
        shuffled.reverse();

        assert_eq!(
            monthly_returns_from_prices("X", &ordered).unwrap(),
            monthly_returns_from_prices("X", &shuffled).unwrap()
        );
    }

    #[test]
    fn test_monthly_returns_from_prices_rejects_bad_price() {
        let prices = vec![(date(2024, 1, 31), 100.0), (date(2024, 2, 29), 0.0)];
        assert!(matches!(
            monthly_returns_from_prices("X", &prices),
            Err(SourceError::InvalidPrice { .. })
        ));
    }
}
