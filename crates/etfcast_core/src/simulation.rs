//! Monte Carlo path simulation
//!
//! Each path starts at the initial amount and compounds one normally
//! distributed monthly return per month. Returns are i.i.d.
//! `Normal(monthly_mean, monthly_std_dev)`, which understates fat tails. Values
//! are not floored unless `floor_at_zero` is set, so a long enough run of bad
//! draws can take a path negative.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use rand_distr::{Distribution, Normal};
#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::error::ProjectionError;
use crate::model::{PortfolioStatistics, ProjectionParams, SimulationRun};

/// Paths simulated per RNG stream in [`simulate_paths`]
pub const BATCH_SIZE: usize = 100;

const BATCH_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Build the monthly return distribution, rejecting non-finite moments.
pub fn return_distribution(stats: &PortfolioStatistics) -> Result<Normal<f64>, ProjectionError> {
    if !stats.monthly_mean.is_finite() {
        return Err(ProjectionError::NumericalDegeneracy {
            quantity: "monthly mean",
            value: stats.monthly_mean,
        });
    }
    Normal::new(stats.monthly_mean, stats.monthly_std_dev).map_err(|_| {
        ProjectionError::NumericalDegeneracy {
            quantity: "monthly standard deviation",
            value: stats.monthly_std_dev,
        }
    })
}

/// Fill `out` with one path's values for months `1..=out.len()`.
#[inline]
fn simulate_path<R: Rng + ?Sized>(
    dist: &Normal<f64>,
    initial_amount: f64,
    floor_at_zero: bool,
    rng: &mut R,
    out: &mut [f64],
) {
    let mut value = initial_amount;
    for slot in out.iter_mut() {
        let r = dist.sample(rng);
        value *= 1.0 + r;
        if floor_at_zero && value < 0.0 {
            value = 0.0;
        }
        *slot = value;
    }
}

fn check_shape(params: &ProjectionParams) -> Result<(usize, usize), ProjectionError> {
    let months = params.forecast_months();
    if params.simulations == 0 || months == 0 {
        return Err(ProjectionError::EmptySimulation);
    }
    Ok((params.simulations, months))
}

/// Simulate all paths sequentially, drawing from the caller's RNG.
///
/// Path `p` consumes the RNG after path `p - 1`, so a seeded generator gives
/// a reproducible run.
pub fn simulate_paths_with_rng<R: Rng + ?Sized>(
    stats: &PortfolioStatistics,
    params: &ProjectionParams,
    rng: &mut R,
) -> Result<SimulationRun, ProjectionError> {
    let (simulations, months) = check_shape(params)?;
    let dist = return_distribution(stats)?;

    let mut values = vec![0.0; simulations * months];
    for path in values.chunks_exact_mut(months) {
        simulate_path(&dist, params.initial_amount, params.floor_at_zero, rng, path);
    }

    SimulationRun::from_values(simulations, months, params.initial_amount, values)
        .ok_or(ProjectionError::EmptySimulation)
}

fn batch_rng(seed: u64, batch: usize) -> SmallRng {
    SmallRng::seed_from_u64(seed ^ (batch as u64).wrapping_mul(BATCH_SEED_STRIDE))
}

/// Simulate all paths in batches of [`BATCH_SIZE`], each batch with its own
/// RNG derived from `seed` and the batch index.
///
/// With the `parallel` feature batches run on the rayon pool. Batches are
/// reassembled in index order, so the result depends only on `seed`.
pub fn simulate_paths(
    stats: &PortfolioStatistics,
    params: &ProjectionParams,
    seed: u64,
) -> Result<SimulationRun, ProjectionError> {
    let (simulations, months) = check_shape(params)?;
    let dist = return_distribution(stats)?;
    let num_batches = simulations.div_ceil(BATCH_SIZE);

    let run_batch = |i: usize| {
        let mut rng = batch_rng(seed, i);
        let batch_size = if i == num_batches - 1 {
            simulations - i * BATCH_SIZE
        } else {
            BATCH_SIZE
        };

        let mut values = vec![0.0; batch_size * months];
        for path in values.chunks_exact_mut(months) {
            simulate_path(
                &dist,
                params.initial_amount,
                params.floor_at_zero,
                &mut rng,
                path,
            );
        }
        values
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<f64>> = (0..num_batches).into_par_iter().map(run_batch).collect();
    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<f64>> = (0..num_batches).map(run_batch).collect();

    tracing::debug!(simulations, months, num_batches, "simulated paths");

    SimulationRun::from_values(simulations, months, params.initial_amount, batches.concat())
        .ok_or(ProjectionError::EmptySimulation)
}
