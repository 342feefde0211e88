//! The projection pipeline: validate, estimate, simulate, aggregate.
//!
//! One call is one independent unit of work. Nothing is shared between calls
//! apart from the read-only return source.

use rand::Rng;

use crate::error::ProjectionError;
use crate::estimator::estimate_statistics;
use crate::history::ReturnSource;
use crate::model::{
    MonteCarloResult, PortfolioStatistics, ProjectionParams, ProjectionRequest, SimulationLimits,
};
use crate::percentiles::aggregate;
use crate::simulation::{simulate_paths, simulate_paths_with_rng};
use crate::validation::{validate_params, validate_request};

/// Run the full pipeline for `request`, reading history from `source`.
///
/// The request is validated before `source` is touched.
pub fn run_projection<S: ReturnSource + ?Sized>(
    request: &ProjectionRequest,
    source: &S,
    limits: &SimulationLimits,
) -> Result<MonteCarloResult, ProjectionError> {
    validate_request(request, limits)?;

    let stats = estimate_statistics(
        &request.portfolio,
        &request.window,
        request.params.initial_amount,
        source,
    )?;

    project_from_statistics(stats, &request.params, limits)
}

/// Simulate and aggregate from already known statistics.
///
/// Uses `params.seed` when set, otherwise a fresh seed from OS entropy.
pub fn project_from_statistics(
    stats: PortfolioStatistics,
    params: &ProjectionParams,
    limits: &SimulationLimits,
) -> Result<MonteCarloResult, ProjectionError> {
    validate_params(params, limits)?;

    let seed = params.seed.unwrap_or_else(rand::random);
    tracing::debug!(
        seed,
        simulations = params.simulations,
        forecast_months = params.forecast_months(),
        "running monte carlo projection"
    );

    let run = simulate_paths(&stats, params, seed)?;
    aggregate(&run, stats)
}

/// Like [`project_from_statistics`] but draws every return from `rng`,
/// sequentially, ignoring `params.seed`.
pub fn project_with_rng<R: Rng + ?Sized>(
    stats: PortfolioStatistics,
    params: &ProjectionParams,
    limits: &SimulationLimits,
    rng: &mut R,
) -> Result<MonteCarloResult, ProjectionError> {
    validate_params(params, limits)?;
    let run = simulate_paths_with_rng(&stats, params, rng)?;
    aggregate(&run, stats)
}
