use serde::{Deserialize, Serialize};

use super::Period;

/// Fractional return of one instrument (or the blended portfolio) over a month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub period: Period,
    pub value: f64,
}

impl MonthlyReturn {
    #[must_use]
    pub fn new(period: Period, value: f64) -> Self {
        Self { period, value }
    }
}

/// Ordered sequence of monthly returns, ascending by period.
///
/// Produced by a `ReturnSource` for one request and dropped once the
/// portfolio's blended series has been computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries {
    pub points: Vec<MonthlyReturn>,
}

impl ReturnSeries {
    #[must_use]
    pub fn new(points: Vec<MonthlyReturn>) -> Self {
        Self { points }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.points.iter().map(|p| p.period)
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// First period that is not strictly after its predecessor, if any.
    #[must_use]
    pub fn first_unordered_period(&self) -> Option<Period> {
        self.points
            .windows(2)
            .find(|w| w[1].period <= w[0].period)
            .map(|w| w[1].period)
    }
}

impl FromIterator<MonthlyReturn> for ReturnSeries {
    fn from_iter<I: IntoIterator<Item = MonthlyReturn>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
