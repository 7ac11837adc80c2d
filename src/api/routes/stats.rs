//! Stats Routes
//!
//! - GET /stats, GET /api/v1/stats - Aggregate readings matching filters
//!
//! The response carries an `X-Cache: HIT|MISS` header. The flag is
//! observational only; the body is identical either way.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::api::dto::{StatsParams, StatsResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::query::QueryFilter;

/// Response header reporting whether the result came from the cache
pub const X_CACHE: &str = "x-cache";

/// GET /stats
///
/// Query parameters: `location`, `sensor`, `start_date`, `end_date`, all
/// optional. Filtering and aggregation run on the blocking pool since a
/// miss scans the whole dataset.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> ApiResult<impl IntoResponse> {
    let filter = QueryFilter::from(params);
    let service = Arc::clone(&state.service);

    let outcome = tokio::task::spawn_blocking(move || service.execute(&filter))
        .await
        .map_err(|e| ApiError::Internal(format!("Query task failed: {}", e)))??;

    let body = StatsResponse {
        stats: (*outcome.result).clone(),
    };

    Ok(([(X_CACHE, outcome.cache.as_str())], Json(body)))
}
