//! Query Normalizer
//!
//! Turns a raw [`QueryFilter`] into a [`CacheKey`] plus the parsed bounds the
//! aggregation engine matches against. Normalization is pure: the same input
//! always yields the same key.
//!
//! - Labels: trimmed and lowercased; an absent label stays absent, which is
//!   distinct from an empty string.
//! - Dates: parsed with the shared grammar and re-rendered canonically, so
//!   `2024-01-15`, ` 2024-01-15T00:00:00Z` and `2024-01-15 02:00:00+02:00`
//!   share one key.
//! - Any unparseable date rejects the whole query.

use crate::dataset::normalize_label;
use crate::query::error::{QueryError, QueryResult};
use crate::query::filter::QueryFilter;
use crate::timestamp::{canonical_iso, parse_timestamp};
use chrono::{DateTime, Utc};
use std::fmt;

/// Canonical, hashable identity of a query.
///
/// `None` marks an absent filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub location: Option<String>,
    pub sensor: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |p: &Option<String>| p.clone().unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "location={} sensor={} start={} end={}",
            part(&self.location),
            part(&self.sensor),
            part(&self.start),
            part(&self.end)
        )
    }
}

/// A validated query: its cache key and the instants it is bounded by
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuery {
    key: CacheKey,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl NormalizedQuery {
    /// The cache key for this query
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Consume the query, keeping only its key
    pub fn into_key(self) -> CacheKey {
        self.key
    }

    /// Normalized location to match, if any
    pub fn location(&self) -> Option<&str> {
        self.key.location.as_deref()
    }

    /// Normalized sensor to match, if any
    pub fn sensor(&self) -> Option<&str> {
        self.key.sensor.as_deref()
    }

    /// Inclusive start bound
    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    /// Inclusive end bound
    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }
}

fn parse_bound(raw: Option<&str>, field: &'static str) -> QueryResult<Option<DateTime<Utc>>> {
    match raw {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| QueryError::Validation {
                input: s.to_string(),
                field,
            }),
    }
}

/// Validate and canonicalize a raw filter
pub fn normalize(filter: &QueryFilter) -> QueryResult<NormalizedQuery> {
    let start = parse_bound(filter.start_date.as_deref(), "start_date")?;
    let end = parse_bound(filter.end_date.as_deref(), "end_date")?;

    let key = CacheKey {
        location: filter.location.as_deref().map(normalize_label),
        sensor: filter.sensor.as_deref().map(normalize_label),
        start: start.as_ref().map(canonical_iso),
        end: end.as_ref().map(canonical_iso),
    };

    Ok(NormalizedQuery { key, start, end })
}
