use axum::{Json, extract::State, extract::rejection::JsonRejection};
use etfcast_core::model::{MonteCarloResult, SimulationLimits};
use etfcast_core::{ProjectionError, run_projection};

use super::AppState;
use crate::api_conversion::{ResolvedRequest, to_projection_request};
use crate::api_types::{MonteCarloRequest, MonteCarloResponse};
use crate::db::{DbConn, IndexReturnSource};
use crate::error::{ApiError, ApiResult};

/// Run one projection against the price store on the current thread.
pub fn project_blocking(
    db: DbConn,
    resolved: ResolvedRequest,
    limits: &SimulationLimits,
) -> Result<MonteCarloResult, ProjectionError> {
    let source = IndexReturnSource::new(db, resolved.index_codes);
    run_projection(&resolved.request, &source, limits)
}

/// `POST /api/backtest/monte-carlo`
///
/// The pipeline runs on the blocking pool. When the timeout fires the
/// response is sent but the blocking task still runs to completion.
pub async fn run_monte_carlo(
    State(state): State<AppState>,
    payload: Result<Json<MonteCarloRequest>, JsonRejection>,
) -> ApiResult<Json<MonteCarloResponse>> {
    let Json(req) = payload?;
    let resolved = to_projection_request(&req)?;

    let params = resolved.request.params;
    tracing::info!(
        funds = resolved.request.portfolio.len(),
        forecast_years = params.forecast_years,
        simulations = params.simulations,
        seeded = params.seed.is_some(),
        "Running Monte Carlo projection"
    );

    let AppState { db, limits, timeout } = state;
    let task = tokio::task::spawn_blocking(move || project_blocking(db, resolved, &limits));

    let result = tokio::time::timeout(timeout, task)
        .await
        .map_err(|_| ApiError::Timeout(timeout))?
        .map_err(|err| {
            tracing::error!("Projection task failed: {err}");
            ApiError::InternalError
        })??;

    tracing::debug!(
        median = result.final_values.average,
        "Monte Carlo projection finished"
    );
    Ok(Json(result.into()))
}
