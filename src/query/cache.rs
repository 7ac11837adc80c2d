//! Result Cache
//!
//! Concurrent map from [`CacheKey`] to a shared, immutable
//! [`AggregateResult`]. The lock guards only the map structure; values are
//! wrapped in `Arc` and never mutated after insertion.
//!
//! # Growth
//!
//! There is no eviction, expiry or size cap. The dataset never changes, so a
//! cached result never goes stale, but the map grows with every distinct
//! query for the life of the process. An unbounded key space (e.g. clients
//! sweeping arbitrary date ranges) therefore means unbounded memory.
//!
//! # Racing writers
//!
//! Two requests that miss on the same key may both compute and both call
//! [`ResultCache::put`]. Results are a pure function of the key and the
//! immutable dataset, so both values are equal. The first stored value is
//! kept and returned to every writer, and the map stays consistent either way.

use crate::query::aggregate::AggregateResult;
use crate::query::normalize::CacheKey;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Point-in-time cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Distinct keys stored
    pub entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}

/// Append-only, thread-safe result cache
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, Arc<AggregateResult>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached result
    pub fn get(&self, key: &CacheKey) -> Option<Arc<AggregateResult>> {
        let found = self.entries.read().get(key).cloned();

        match &found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };

        found
    }

    /// Store a result, returning the value now held for `key`.
    ///
    /// If another writer got there first its value is kept; the two are equal
    /// by construction.
    pub fn put(&self, key: CacheKey, result: AggregateResult) -> Arc<AggregateResult> {
        let mut entries = self.entries.write();
        Arc::clone(entries.entry(key).or_insert_with(|| Arc::new(result)))
    }

    /// Number of cached keys
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Whether `key` has a cached result (does not count as a lookup)
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Current counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(location: &str) -> CacheKey {
        CacheKey {
            location: Some(location.to_string()),
            sensor: None,
            start: None,
            end: None,
        }
    }

    fn result(count: u64) -> AggregateResult {
        AggregateResult {
            count,
            avg: Some(1.0),
            min: Some(1.0),
            max: Some(1.0),
        }
    }

    #[test]
    fn test_get_put() {
        let cache = ResultCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&key("lab")).is_none());

        cache.put(key("lab"), result(3));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key("lab")).unwrap().count, 3);
        assert!(cache.get(&key("roof")).is_none());

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 2
            }
        );
    }

    #[test]
    fn test_first_write_is_kept() {
        let cache = ResultCache::new();

        let first = cache.put(key("lab"), result(3));
        let second = cache.put(key("lab"), result(3));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_contains_does_not_touch_counters() {
        let cache = ResultCache::new();
        cache.put(key("lab"), result(1));

        assert!(cache.contains(&key("lab")));
        assert!(!cache.contains(&key("roof")));
        assert_eq!(cache.stats().hits, 0);
        assert_eq!(cache.stats().misses, 0);
    }

    #[test]
    fn test_concurrent_writers_converge() {
        let cache = ResultCache::new();

        let stored: Vec<Arc<AggregateResult>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| cache.put(key("lab"), result(7))))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        let winner = cache.get(&key("lab")).unwrap();
        for value in stored {
            assert!(Arc::ptr_eq(&value, &winner));
        }
    }
}
