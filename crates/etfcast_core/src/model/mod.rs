mod params;
mod period;
mod portfolio;
mod results;
mod series;
mod statistics;

pub use params::{HistoryWindow, ProjectionParams, ProjectionRequest, SimulationLimits};
pub use period::Period;
pub use portfolio::{Portfolio, PortfolioComponent};
pub use results::{FinalValues, MonteCarloResult, PercentileBand, SimulationRun};
pub use series::{MonthlyReturn, ReturnSeries};
pub use statistics::PortfolioStatistics;
