//! Query Service
//!
//! Orchestrates one stats request end to end:
//!
//! ```text
//! dataset ready? ──no──▶ DataUnavailable
//!      │
//! normalize ──invalid──▶ Validation (nothing cached)
//!      │
//! cache lookup ──hit──▶ result, HIT
//!      │ miss
//! aggregate → cache store → result, MISS
//! ```
//!
//! The service owns the cache and a handle to the dataset store; it is built
//! once at startup and shared by reference with every request handler.

use crate::dataset::DatasetStore;
use crate::query::aggregate::{aggregate, AggregateResult};
use crate::query::cache::{CacheStats, ResultCache};
use crate::query::error::{QueryError, QueryResult};
use crate::query::filter::QueryFilter;
use crate::query::normalize::normalize;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Whether a result came from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Header form: `HIT` or `MISS`
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, CacheStatus::Hit)
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A successful answer plus how it was produced
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// The aggregate, shared with the cache
    pub result: Arc<AggregateResult>,
    /// Hit/miss flag for observability; never affects `result`
    pub cache: CacheStatus,
}

/// Normalizer → cache → aggregation engine pipeline
#[derive(Debug)]
pub struct QueryService {
    dataset: DatasetStore,
    cache: ResultCache,
}

impl QueryService {
    /// Create a service over `dataset` with an empty cache
    pub fn new(dataset: DatasetStore) -> Self {
        Self {
            dataset,
            cache: ResultCache::new(),
        }
    }

    /// Answer a stats query
    pub fn execute(&self, filter: &QueryFilter) -> QueryResult<QueryOutcome> {
        let dataset = self.dataset.get().ok_or(QueryError::DataUnavailable)?;

        let query = normalize(filter)?;

        if let Some(result) = self.cache.get(query.key()) {
            tracing::debug!(key = %query.key(), "Cache hit");
            return Ok(QueryOutcome {
                result,
                cache: CacheStatus::Hit,
            });
        }

        let start = Instant::now();
        let computed = aggregate(&dataset, &query);

        tracing::debug!(
            key = %query.key(),
            count = computed.count,
            rows_scanned = dataset.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Cache miss, computed aggregate"
        );

        let result = self.cache.put(query.into_key(), computed);
        Ok(QueryOutcome {
            result,
            cache: CacheStatus::Miss,
        })
    }

    /// The dataset store this service reads from
    pub fn dataset(&self) -> &DatasetStore {
        &self.dataset
    }

    /// The result cache
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
