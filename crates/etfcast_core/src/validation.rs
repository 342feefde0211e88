//! Request validation
//!
//! Everything here runs before historical data is fetched, so a bad request
//! never costs a database round trip or a simulation loop.

use crate::error::{InputError, ProjectionError};
use crate::model::{HistoryWindow, Portfolio, ProjectionParams, ProjectionRequest, SimulationLimits};

/// Allowed distance of the weight sum from 1.0
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Check identifiers, weights and expense ratios.
pub fn validate_portfolio(portfolio: &Portfolio) -> Result<(), InputError> {
    if portfolio.is_empty() {
        return Err(InputError::EmptyPortfolio);
    }

    for (index, component) in portfolio.iter().enumerate() {
        if component.instrument_id.trim().is_empty() {
            return Err(InputError::EmptyInstrumentId { index });
        }
        if !component.weight.is_finite() || !(0.0..=1.0).contains(&component.weight) {
            return Err(InputError::InvalidWeight {
                instrument: component.instrument_id.clone(),
                weight: component.weight,
            });
        }
        if !component.expense_ratio.is_finite() || !(0.0..1.0).contains(&component.expense_ratio)
        {
            return Err(InputError::InvalidExpenseRatio {
                instrument: component.instrument_id.clone(),
                expense_ratio: component.expense_ratio,
            });
        }
    }

    let sum = portfolio.weight_sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(InputError::WeightSum { sum });
    }

    Ok(())
}

pub fn validate_window(window: &HistoryWindow) -> Result<(), InputError> {
    if window.start >= window.end {
        return Err(InputError::InvalidDateRange {
            start: window.start,
            end: window.end,
        });
    }
    Ok(())
}

/// Check amounts, horizon and simulation count against `limits`.
pub fn validate_params(
    params: &ProjectionParams,
    limits: &SimulationLimits,
) -> Result<(), ProjectionError> {
    if !params.initial_amount.is_finite() || params.initial_amount <= 0.0 {
        return Err(InputError::InvalidInitialAmount(params.initial_amount).into());
    }
    if params.forecast_years == 0 {
        return Err(InputError::ZeroForecastYears.into());
    }
    if params.simulations == 0 {
        return Err(InputError::ZeroSimulations.into());
    }
    if params.simulations > limits.max_simulations {
        return Err(ProjectionError::ResourceLimit {
            field: "simulations",
            value: params.simulations,
            max: limits.max_simulations,
        });
    }
    let months = params.forecast_months();
    if months > limits.max_forecast_months {
        return Err(ProjectionError::ResourceLimit {
            field: "forecast months",
            value: months,
            max: limits.max_forecast_months,
        });
    }
    Ok(())
}

pub fn validate_request(
    request: &ProjectionRequest,
    limits: &SimulationLimits,
) -> Result<(), ProjectionError> {
    validate_portfolio(&request.portfolio)?;
    validate_window(&request.window)?;
    validate_params(&request.params, limits)
}
