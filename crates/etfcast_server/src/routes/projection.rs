use axum::{Router, routing::post};

use crate::handlers::{self, AppState};

pub fn projection_routes() -> Router<AppState> {
    Router::new().route(
        "/api/backtest/monte-carlo",
        post(handlers::run_monte_carlo),
    )
}
