use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};

use super::AppState;
use crate::api_types::{IndexSummary, PricePoint, PriceUploadResponse};
use crate::db;
use crate::error::ApiResult;
use crate::validation;

/// `GET /api/indexes`
pub async fn list_indexes(State(state): State<AppState>) -> ApiResult<Json<Vec<IndexSummary>>> {
    let conn = state.db.lock()?;
    let indexes = db::list_indexes(&conn)?
        .into_iter()
        .map(|range| IndexSummary {
            index_code: range.index_code,
            start_date: range.first_date.to_string(),
            end_date: range.last_date.to_string(),
            data_points: range.data_points as u32,
        })
        .collect();

    Ok(Json(indexes))
}

/// `POST /api/indexes/{code}/prices`
pub async fn upload_prices(
    State(state): State<AppState>,
    Path(code): Path<String>,
    payload: Result<Json<Vec<PricePoint>>, JsonRejection>,
) -> ApiResult<Json<PriceUploadResponse>> {
    validation::validate_index_code(&code)?;
    let Json(points) = payload?;
    let prices = validation::validate_price_upload(&points)?;

    let upserted = {
        let mut conn = state.db.lock()?;
        db::upsert_prices(&mut conn, &code, &prices)?
    };
    tracing::info!(index_code = %code, upserted, "Stored index prices");

    Ok(Json(PriceUploadResponse {
        index_code: code,
        upserted: upserted as u32,
    }))
}
