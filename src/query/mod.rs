//! Sensorstats Query Core
//!
//! Answers "count/avg/min/max of readings matching these filters" and
//! memoizes the answers:
//!
//! - **filter**: raw `QueryFilter` as received from a caller
//! - **normalize**: validation and canonical `CacheKey` derivation
//! - **aggregate**: filter + fold over the dataset
//! - **cache**: concurrent, append-only `ResultCache`
//! - **service**: the `QueryService` pipeline tying them together
//!
//! # Example
//!
//! ```rust
//! use sensorstats::dataset::{Dataset, DatasetStore, Reading};
//! use sensorstats::query::{CacheStatus, QueryFilter, QueryService};
//! use chrono::Utc;
//!
//! let dataset = Dataset::from_readings(vec![
//!     Reading::new(Utc::now(), "lab", "temperature", 21.0),
//!     Reading::new(Utc::now(), "lab", "temperature", 23.0),
//! ]);
//! let service = QueryService::new(DatasetStore::loaded(dataset));
//!
//! let filter = QueryFilter::new().location("Lab").sensor("temperature");
//! let first = service.execute(&filter).unwrap();
//! assert_eq!(first.cache, CacheStatus::Miss);
//! assert_eq!(first.result.avg, Some(22.0));
//!
//! let again = service.execute(&filter).unwrap();
//! assert_eq!(again.cache, CacheStatus::Hit);
//! ```

mod aggregate;
mod cache;
mod error;
mod filter;
mod normalize;
mod service;

pub use aggregate::{aggregate, AggregateResult};
pub use cache::{CacheStats, ResultCache};
pub use error::{QueryError, QueryResult};
pub use filter::QueryFilter;
pub use normalize::{normalize, CacheKey, NormalizedQuery};
pub use service::{CacheStatus, QueryOutcome, QueryService};
