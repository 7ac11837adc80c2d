//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON and query strings.

use serde::{Deserialize, Serialize};

use crate::query::{AggregateResult, CacheStats, QueryFilter};

// ============================================
// STATS DTOs
// ============================================

/// Query-string parameters for `GET /stats`
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub sensor: Option<String>,
    /// Inclusive start (any supported date/datetime spelling)
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive end (any supported date/datetime spelling)
    #[serde(default)]
    pub end_date: Option<String>,
}

impl From<StatsParams> for QueryFilter {
    fn from(params: StatsParams) -> Self {
        QueryFilter {
            location: params.location,
            sensor: params.sensor,
            start_date: params.start_date,
            end_date: params.end_date,
        }
    }
}

/// Stats response body
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: AggregateResult,
}

// ============================================
// CACHE DTOs
// ============================================

/// Cache counters response
#[derive(Debug, Serialize)]
pub struct CacheResponse {
    #[serde(flatten)]
    pub stats: CacheStats,
    /// Hits / lookups, 0 when nothing was looked up yet
    pub hit_ratio: f64,
}

impl From<CacheStats> for CacheResponse {
    fn from(stats: CacheStats) -> Self {
        let lookups = stats.hits + stats.misses;
        let hit_ratio = if lookups == 0 {
            0.0
        } else {
            stats.hits as f64 / lookups as f64
        };
        Self { stats, hit_ratio }
    }
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, loading
    pub status: String,
    /// Dataset status: ok, not_loaded
    pub dataset: String,
    /// Rows in the loaded dataset
    pub dataset_rows: usize,
    /// Cached query results
    pub cache_entries: usize,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
