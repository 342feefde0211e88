use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{self, AppState};

pub fn index_routes() -> Router<AppState> {
    Router::new()
        .route("/api/indexes", get(handlers::list_indexes))
        .route("/api/indexes/{code}/prices", post(handlers::upload_prices))
}
