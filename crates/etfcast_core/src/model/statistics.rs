use serde::{Deserialize, Serialize};

/// Summary of the blended historical monthly-return series.
///
/// Annual figures use the i.i.d. scaling `mean * 12` and `std_dev * sqrt(12)`.
/// This is an approximation; it does not compound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioStatistics {
    /// Value of the initial amount after the whole historical window, for display only
    pub current_value: f64,
    pub monthly_mean: f64,
    pub monthly_std_dev: f64,
    pub annual_mean: f64,
    pub annual_std_dev: f64,
    /// Number of blended monthly periods the moments were estimated from
    pub periods: usize,
}

impl PortfolioStatistics {
    /// Build statistics from monthly moments, deriving the annualized figures.
    #[must_use]
    pub fn from_monthly(
        monthly_mean: f64,
        monthly_std_dev: f64,
        current_value: f64,
        periods: usize,
    ) -> Self {
        Self {
            current_value,
            monthly_mean,
            monthly_std_dev,
            annual_mean: monthly_mean * 12.0,
            annual_std_dev: monthly_std_dev * 12f64.sqrt(),
            periods,
        }
    }
}
