use std::fmt;

use jiff::civil::Date;

use crate::model::Period;

/// Problems with the caller-supplied request, detected before any data is fetched.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    EmptyPortfolio,
    EmptyInstrumentId {
        index: usize,
    },
    InvalidWeight {
        instrument: String,
        weight: f64,
    },
    WeightSum {
        sum: f64,
    },
    InvalidExpenseRatio {
        instrument: String,
        expense_ratio: f64,
    },
    InvalidDateRange {
        start: Date,
        end: Date,
    },
    InvalidInitialAmount(f64),
    ZeroForecastYears,
    ZeroSimulations,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::EmptyPortfolio => write!(f, "portfolio must contain at least one component"),
            InputError::EmptyInstrumentId { index } => {
                write!(f, "portfolio component #{index} has an empty identifier")
            }
            InputError::InvalidWeight { instrument, weight } => {
                write!(f, "weight of {instrument} must be between 0 and 1 (got {weight})")
            }
            InputError::WeightSum { sum } => {
                write!(f, "portfolio weights must sum to 1 (got {sum:.6})")
            }
            InputError::InvalidExpenseRatio {
                instrument,
                expense_ratio,
            } => write!(
                f,
                "expense ratio of {instrument} must be a finite fraction in [0, 1) (got {expense_ratio})"
            ),
            InputError::InvalidDateRange { start, end } => {
                write!(f, "start date {start} must be before end date {end}")
            }
            InputError::InvalidInitialAmount(amount) => {
                write!(f, "initial amount must be a positive number (got {amount})")
            }
            InputError::ZeroForecastYears => write!(f, "forecast horizon must be at least 1 year"),
            InputError::ZeroSimulations => write!(f, "simulation count must be at least 1"),
        }
    }
}

impl std::error::Error for InputError {}

/// Failures reported by a historical data collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// The backing store could not be read
    Unavailable { instrument: String, reason: String },
    /// A stored price is zero, negative or not finite
    InvalidPrice {
        instrument: String,
        date: Date,
        price: f64,
    },
    /// No series is mapped to the requested identifier
    UnknownInstrument(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Unavailable { instrument, reason } => {
                write!(f, "historical data for {instrument} unavailable: {reason}")
            }
            SourceError::InvalidPrice {
                instrument,
                date,
                price,
            } => write!(f, "invalid price {price} for {instrument} on {date}"),
            SourceError::UnknownInstrument(instrument) => {
                write!(f, "no historical series is mapped to {instrument}")
            }
        }
    }
}

impl std::error::Error for SourceError {}

/// Coarse classification used at the service boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidInput,
    InsufficientHistory,
    NumericalDegeneracy,
    ResourceLimit,
    DataSource,
}

/// Errors raised by the projection pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionError {
    InvalidInput(InputError),
    /// A request parameter exceeds the configured hard ceiling
    ResourceLimit {
        field: &'static str,
        value: usize,
        max: usize,
    },
    /// A component has no data at all in the requested window
    MissingHistory { instrument: String },
    /// The blended series has fewer than two periods
    InsufficientHistory { periods: usize },
    /// A component's periods differ from the rest of the portfolio
    MisalignedHistory { instrument: String, period: Period },
    /// A component's series is not strictly increasing by period
    UnorderedHistory { instrument: String, period: Period },
    NumericalDegeneracy { quantity: &'static str, value: f64 },
    /// No paths or no months were produced
    EmptySimulation,
    Source(SourceError),
}

impl ProjectionError {
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProjectionError::InvalidInput(_) => ErrorCategory::InvalidInput,
            ProjectionError::ResourceLimit { .. } => ErrorCategory::ResourceLimit,
            ProjectionError::MissingHistory { .. }
            | ProjectionError::InsufficientHistory { .. }
            | ProjectionError::MisalignedHistory { .. }
            | ProjectionError::UnorderedHistory { .. } => ErrorCategory::InsufficientHistory,
            ProjectionError::NumericalDegeneracy { .. } | ProjectionError::EmptySimulation => {
                ErrorCategory::NumericalDegeneracy
            }
            ProjectionError::Source(SourceError::InvalidPrice { .. }) => {
                ErrorCategory::InsufficientHistory
            }
            ProjectionError::Source(SourceError::UnknownInstrument(_)) => {
                ErrorCategory::InvalidInput
            }
            ProjectionError::Source(SourceError::Unavailable { .. }) => ErrorCategory::DataSource,
        }
    }
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::InvalidInput(e) => write!(f, "invalid input: {e}"),
            ProjectionError::ResourceLimit { field, value, max } => {
                write!(f, "{field} of {value} exceeds the maximum of {max}")
            }
            ProjectionError::MissingHistory { instrument } => {
                write!(f, "no historical data for {instrument} in the requested range")
            }
            ProjectionError::InsufficientHistory { periods } => write!(
                f,
                "insufficient historical data: {periods} monthly period(s) in range, at least 2 required"
            ),
            ProjectionError::MisalignedHistory { instrument, period } => write!(
                f,
                "historical data for {instrument} does not line up with the rest of the portfolio at {period}"
            ),
            ProjectionError::UnorderedHistory { instrument, period } => write!(
                f,
                "historical data for {instrument} is out of order or duplicated at {period}"
            ),
            ProjectionError::NumericalDegeneracy { quantity, value } => {
                write!(f, "{quantity} is not a finite number ({value})")
            }
            ProjectionError::EmptySimulation => {
                write!(f, "simulation produced no paths or no months")
            }
            ProjectionError::Source(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ProjectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProjectionError::InvalidInput(e) => Some(e),
            ProjectionError::Source(e) => Some(e),
            _ => None,
        }
    }
}

impl From<InputError> for ProjectionError {
    fn from(err: InputError) -> Self {
        ProjectionError::InvalidInput(err)
    }
}

impl From<SourceError> for ProjectionError {
    fn from(err: SourceError) -> Self {
        ProjectionError::Source(err)
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;
