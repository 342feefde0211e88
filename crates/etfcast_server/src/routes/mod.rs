pub mod indexes;
pub mod projection;

pub use indexes::index_routes;
pub use projection::projection_routes;

use axum::{Router, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::AppState;

/// The full application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "etfcast projection server" }))
        .merge(projection_routes())
        .merge(index_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
