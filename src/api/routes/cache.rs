//! Cache Routes
//!
//! - GET /api/v1/cache - Result cache counters

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::CacheResponse;
use crate::api::state::AppState;

/// GET /api/v1/cache
pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheResponse> {
    Json(state.service.cache_stats().into())
}
