//! End-to-end projection tests
//!
//! These tests verify the shape and ordering of the percentile output,
//! zero-volatility compounding, scale invariance and seeded determinism.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{flat_stats, period, sample_portfolio, sample_source, seeded, ten_year_window};
use crate::error::{ErrorCategory, InputError, ProjectionError};
use crate::history::InMemoryReturnSource;
use crate::model::{
    MonteCarloResult, Portfolio, PortfolioComponent, PortfolioStatistics, ProjectionParams,
    ProjectionRequest, SimulationLimits,
};
use crate::projection::{project_from_statistics, project_with_rng, run_projection};

fn sample_request(params: ProjectionParams) -> ProjectionRequest {
    ProjectionRequest::new(sample_portfolio(), ten_year_window(), params)
}

fn run(params: ProjectionParams) -> MonteCarloResult {
    run_projection(&sample_request(params), &sample_source(), &SimulationLimits::default())
        .unwrap()
}

#[test]
fn test_chart_covers_month_zero_through_horizon() {
    let result = run(seeded(10_000.0, 3, 200));

    assert_eq!(result.chart_data.len(), 3 * 12 + 1);
    assert_eq!(result.forecast_months(), 36);
    for (i, band) in result.chart_data.iter().enumerate() {
        assert_eq!(band.month, i);
    }
}

#[test]
fn test_month_zero_is_exactly_initial_amount() {
    let result = run(seeded(123_456.78, 2, 150));
    assert_eq!(result.chart_data[0].to_array(), [123_456.78; 5]);
}

#[test]
fn test_percentiles_are_ordered_every_month() {
    let result = run(seeded(50_000.0, 10, 600));
    for band in &result.chart_data {
        assert!(band.is_ordered(), "unordered band at month {}", band.month);
    }
}

#[test]
fn test_final_values_match_last_band() {
    let result = run(seeded(50_000.0, 5, 300));
    let last = result.chart_data.last().unwrap();

    assert_eq!(result.final_values.very_bad, last.p5);
    assert_eq!(result.final_values.bad, last.p16);
    assert_eq!(result.final_values.average, last.p50);
    assert_eq!(result.final_values.good, last.p84);
    assert_eq!(result.final_values.great, last.p95);
}

#[test]
fn test_stats_are_passed_through() {
    let source = sample_source();
    let request = sample_request(seeded(10_000.0, 1, 10));
    let stats = crate::estimator::estimate_statistics(
        &request.portfolio,
        &request.window,
        request.params.initial_amount,
        &source,
    )
    .unwrap();

    let result = run_projection(&request, &source, &SimulationLimits::default()).unwrap();
    assert_eq!(result.stats, stats);
    assert_eq!(result.stats.periods, 120);
}

#[test]
fn test_zero_volatility_collapses_distribution() {
    let params = seeded(1_000.0, 2, 50);
    let result =
        project_from_statistics(flat_stats(0.01), &params, &SimulationLimits::default()).unwrap();

    for band in &result.chart_data {
        let expected = 1_000.0 * 1.01f64.powi(band.month as i32);
        for value in band.to_array() {
            assert!(
                (value - expected).abs() < 1e-9,
                "month {}: {value} != {expected}",
                band.month
            );
        }
    }
}

#[test]
fn test_end_to_end_half_percent_month() {
    let mut source = InMemoryReturnSource::new();
    source.insert_constant("IE00B5BMR087", period(2015, 1), period(2024, 12), 0.005);
    let request = ProjectionRequest::new(
        Portfolio::single("IE00B5BMR087", 0.0),
        ten_year_window(),
        ProjectionParams::new(500_000.0, 1, 25),
    );

    let result = run_projection(&request, &source, &SimulationLimits::default()).unwrap();

    let expected = 500_000.0 * 1.005f64.powi(12);
    assert!((expected - 530_838.906).abs() < 1e-3);
    let finals = result.final_values;
    for value in [finals.very_bad, finals.bad, finals.average, finals.good, finals.great] {
        assert!((value - expected).abs() < 1e-6, "{value} != {expected}");
    }
}

#[test]
fn test_doubling_initial_amount_doubles_output() {
    let stats = PortfolioStatistics::from_monthly(0.006, 0.045, 0.0, 120);
    let limits = SimulationLimits::default();

    let base = project_from_statistics(stats, &seeded(40_000.0, 4, 400), &limits).unwrap();
    let doubled = project_from_statistics(stats, &seeded(80_000.0, 4, 400), &limits).unwrap();

    for (a, b) in base.chart_data.iter().zip(&doubled.chart_data) {
        for (x, y) in a.to_array().into_iter().zip(b.to_array()) {
            assert!((2.0 * x - y).abs() <= 1e-9 * y.abs().max(1.0));
        }
    }
    assert!((2.0 * base.final_values.average - doubled.final_values.average).abs() < 1e-6);
}

#[test]
fn test_seeded_runs_are_identical() {
    let params = seeded(75_000.0, 10, 1_000);
    let a = run(params);
    let b = run(params);
    assert_eq!(a, b);

    let c = run(params.with_seed(7));
    assert_ne!(a.chart_data, c.chart_data);
}

#[test]
fn test_injected_rng_is_reproducible() {
    let stats = PortfolioStatistics::from_monthly(0.005, 0.04, 0.0, 120);
    let params = ProjectionParams::new(10_000.0, 2, 120);
    let limits = SimulationLimits::default();

    let a = project_with_rng(stats, &params, &limits, &mut StdRng::seed_from_u64(5)).unwrap();
    let b = project_with_rng(stats, &params, &limits, &mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_unseeded_runs_still_satisfy_invariants() {
    let result = run(ProjectionParams::new(10_000.0, 1, 100));
    assert_eq!(result.chart_data.len(), 13);
    assert_eq!(result.chart_data[0].to_array(), [10_000.0; 5]);
    assert!(result.chart_data.iter().all(|b| b.is_ordered()));
}

#[test]
fn test_weight_sum_within_tolerance_is_accepted() {
    let portfolio = Portfolio::new(vec![
        PortfolioComponent::new("IE00B4L5Y983", 0.7 + 5e-7, 0.002),
        PortfolioComponent::new("IE00BKM4GZ66", 0.3, 0.0018),
    ]);
    let request = ProjectionRequest::new(portfolio, ten_year_window(), seeded(1_000.0, 1, 10));

    assert!(run_projection(&request, &sample_source(), &SimulationLimits::default()).is_ok());
}

#[test]
fn test_weight_sum_outside_tolerance_is_rejected() {
    let portfolio = Portfolio::new(vec![
        PortfolioComponent::new("IE00B4L5Y983", 0.7, 0.002),
        PortfolioComponent::new("IE00BKM4GZ66", 0.29, 0.0018),
    ]);
    let request = ProjectionRequest::new(portfolio, ten_year_window(), seeded(1_000.0, 1, 10));

    let err = run_projection(&request, &sample_source(), &SimulationLimits::default()).unwrap_err();
    assert!(matches!(
        err,
        ProjectionError::InvalidInput(InputError::WeightSum { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::InvalidInput);
}

#[test]
fn test_resource_limits_are_enforced() {
    let limits = SimulationLimits {
        max_simulations: 500,
        max_forecast_months: 120,
    };

    let err = run_projection(&sample_request(seeded(1.0, 1, 501)), &sample_source(), &limits)
        .unwrap_err();
    assert_eq!(
        err,
        ProjectionError::ResourceLimit {
            field: "simulations",
            value: 501,
            max: 500,
        }
    );

    let err = run_projection(&sample_request(seeded(1.0, 11, 10)), &sample_source(), &limits)
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::ResourceLimit);
}

#[test]
fn test_unfloored_paths_can_go_negative() {
    let stats = PortfolioStatistics::from_monthly(-1.5, 0.0, 0.0, 120);
    let limits = SimulationLimits::default();

    let result = project_from_statistics(stats, &seeded(100.0, 1, 5), &limits).unwrap();
    assert!(result.chart_data[1].p50 < 0.0);

    let floored = project_from_statistics(
        stats,
        &seeded(100.0, 1, 5).with_floor_at_zero(true),
        &limits,
    )
    .unwrap();
    assert_eq!(floored.final_values.average, 0.0);
}

#[test]
fn test_result_wire_format() {
    let result = run(seeded(1_000.0, 1, 20));
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["chartData"].as_array().map(Vec::len), Some(13));
    assert_eq!(value["chartData"][0]["month"], 0);
    for key in ["percentile5", "percentile16", "percentile50", "percentile84", "percentile95"] {
        assert_eq!(value["chartData"][0][key], 1_000.0);
    }
    for key in ["currentValue", "monthlyMean", "monthlyStdDev", "annualMean", "annualStdDev"] {
        assert!(value["stats"][key].is_number(), "missing stats.{key}");
    }
    for key in ["veryBad", "bad", "average", "good", "great"] {
        assert!(value["finalValues"][key].is_number(), "missing finalValues.{key}");
    }
}

#[test]
fn test_params_defaults_when_omitted() {
    let params: ProjectionParams = serde_json::from_str(r#"{"initialAmount": 500000}"#).unwrap();
    assert_eq!(params.forecast_years, 10);
    assert_eq!(params.simulations, 600);
    assert_eq!(params.seed, None);
    assert!(!params.floor_at_zero);

    assert!(serde_json::from_str::<ProjectionParams>(r#"{"forecastYears": 5}"#).is_err());
}
