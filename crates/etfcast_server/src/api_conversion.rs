//! Conversion from API request types to the core projection model
//!
//! Wire-level checks run first (see [`crate::validation`]); the portfolio,
//! window and limits are then left to the core, which reports weight and
//! range problems with its own error taxonomy.

use std::collections::HashMap;

use etfcast_core::model::{
    HistoryWindow, Portfolio, PortfolioComponent, ProjectionParams, ProjectionRequest,
};

use crate::api_types::MonteCarloRequest;
use crate::error::{ApiError, ApiResult};
use crate::validation;

/// A core request plus the instrument-to-index mapping the store needs
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub request: ProjectionRequest,
    /// Instrument identifier to index code
    pub index_codes: HashMap<String, String>,
}

pub fn to_projection_request(req: &MonteCarloRequest) -> ApiResult<ResolvedRequest> {
    validation::validate_monte_carlo_request(req)?;

    let start = validation::parse_date("startDate", &req.start_date)?;
    let end = validation::parse_date("endDate", &req.end_date)?;

    let mut index_codes = HashMap::with_capacity(req.portfolio.len());
    for entry in &req.portfolio {
        let code = entry.index_code().trim().to_string();
        match index_codes.get(&entry.identifier) {
            Some(existing) if *existing != code => {
                return Err(ApiError::validation(
                    "portfolio",
                    format!(
                        "{} is mapped to both {existing} and {code}",
                        entry.identifier
                    ),
                ));
            }
            Some(_) => {}
            None => {
                index_codes.insert(entry.identifier.clone(), code);
            }
        }
    }

    let portfolio: Portfolio = req
        .portfolio
        .iter()
        .map(|entry| PortfolioComponent::new(&entry.identifier, entry.weight, entry.expense_ratio))
        .collect();

    let initial_amount = req
        .initial_amount
        .ok_or_else(|| ApiError::validation("initialAmount", "Initial amount is required"))?;
    let forecast_years = u32::try_from(req.forecast_years)
        .map_err(|_| ApiError::validation("forecastYears", "Forecast must be at least 1 year"))?;
    let simulations = usize::try_from(req.simulations).unwrap_or(usize::MAX);

    let mut params = ProjectionParams::new(initial_amount, forecast_years, simulations)
        .with_floor_at_zero(req.floor_at_zero);
    if let Some(seed) = req.seed {
        params = params.with_seed(seed);
    }

    Ok(ResolvedRequest {
        request: ProjectionRequest::new(portfolio, HistoryWindow::new(start, end), params),
        index_codes,
    })
}
