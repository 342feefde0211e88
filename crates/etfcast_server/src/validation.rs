use jiff::civil::Date;

use crate::api_types::{MonteCarloRequest, PricePoint};
use crate::error::{ApiError, ApiResult};

const MAX_NAME_LEN: usize = 200;
const MAX_INDEX_CODE_LEN: usize = 64;

/// Parse an ISO `YYYY-MM-DD` date, naming `field` on failure
pub fn parse_date(field: &str, value: &str) -> ApiResult<Date> {
    value.trim().parse::<Date>().map_err(|err| {
        ApiError::validation(field, format!("'{value}' is not a valid YYYY-MM-DD date: {err}"))
    })
}

/// Validate an index code used as a path parameter or a portfolio mapping
pub fn validate_index_code(code: &str) -> ApiResult<()> {
    if code.trim().is_empty() {
        return Err(ApiError::validation(
            "indexCode",
            "Index code cannot be empty",
        ));
    }

    if code.len() > MAX_INDEX_CODE_LEN {
        return Err(ApiError::validation(
            "indexCode",
            format!("Index code cannot exceed {MAX_INDEX_CODE_LEN} characters"),
        ));
    }

    Ok(())
}

/// Checks that belong to the wire format rather than the projection model:
/// presence of `initialAmount`, integer ranges and display names.
pub fn validate_monte_carlo_request(req: &MonteCarloRequest) -> ApiResult<()> {
    if req.portfolio.is_empty() {
        return Err(ApiError::validation(
            "portfolio",
            "Portfolio must contain at least one fund",
        ));
    }

    for (i, entry) in req.portfolio.iter().enumerate() {
        if entry.identifier.trim().is_empty() {
            return Err(ApiError::validation(
                &format!("portfolio[{i}].identifier"),
                "Identifier cannot be empty",
            ));
        }
        if entry.name.len() > MAX_NAME_LEN {
            return Err(ApiError::validation(
                &format!("portfolio[{i}].name"),
                format!("Name cannot exceed {MAX_NAME_LEN} characters"),
            ));
        }
        if let Some(code) = &entry.index_code {
            validate_index_code(code)?;
        }
    }

    match req.initial_amount {
        None => {
            return Err(ApiError::validation(
                "initialAmount",
                "Initial amount is required",
            ));
        }
        Some(amount) if !amount.is_finite() || amount <= 0.0 => {
            return Err(ApiError::validation(
                "initialAmount",
                "Initial amount must be a positive number",
            ));
        }
        Some(_) => {}
    }

    if req.forecast_years < 1 || req.forecast_years > i64::from(u32::MAX) {
        return Err(ApiError::validation(
            "forecastYears",
            "Forecast must be at least 1 year",
        ));
    }

    if req.simulations < 1 {
        return Err(ApiError::validation(
            "simulations",
            "At least one simulation is required",
        ));
    }

    Ok(())
}

/// Parse and check a price upload, returning `(date, close)` rows.
pub fn validate_price_upload(points: &[PricePoint]) -> ApiResult<Vec<(Date, f64)>> {
    if points.is_empty() {
        return Err(ApiError::validation(
            "prices",
            "Upload must contain at least one price",
        ));
    }

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let date = parse_date(&format!("prices[{i}].date"), &point.date)?;
            if !point.close_price.is_finite() || point.close_price <= 0.0 {
                return Err(ApiError::validation(
                    &format!("prices[{i}].closePrice"),
                    "Close price must be a positive number",
                ));
            }
            Ok((date, point.close_price))
        })
        .collect()
}
