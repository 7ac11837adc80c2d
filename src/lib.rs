//! # Sensorstats
//!
//! Cached aggregate queries over an in-memory table of sensor readings.
//!
//! ## Features
//!
//! - **Load once**: CSV readings are validated and normalized at startup, then frozen
//! - **Canonical keys**: equivalent filters (case, whitespace, date spelling) share a cache entry
//! - **Memoized aggregates**: count/avg/min/max computed once per distinct query
//! - **Concurrent**: shared read-only dataset, lock-guarded append-only cache
//!
//! ## Modules
//!
//! - [`dataset`]: Readings table, CSV loader and load-once store
//! - [`query`]: Normalizer, aggregation engine, result cache, query service
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sensorstats::dataset::{load_csv, DatasetStore};
//! use sensorstats::query::{QueryFilter, QueryService};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (dataset, report) = load_csv("readings.csv".as_ref())?;
//!     println!("Loaded {} rows ({} dropped)", report.rows_loaded, report.rows_dropped);
//!
//!     let service = QueryService::new(DatasetStore::loaded(dataset));
//!
//!     let filter = QueryFilter::new()
//!         .location("lab")
//!         .sensor("temperature")
//!         .start_date("2024-01-01");
//!     let outcome = service.execute(&filter)?;
//!
//!     println!("{} ({}): {:?}", outcome.result.count, outcome.cache, outcome.result.avg);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dataset;
pub mod query;
pub mod timestamp;

// Re-export top-level types for convenience
pub use dataset::{
    load_csv, CsvLoader, Dataset, DatasetError, DatasetResult, DatasetStore, LoadReport, Reading,
};

pub use query::{
    AggregateResult, CacheKey, CacheStats, CacheStatus, QueryError, QueryFilter, QueryOutcome,
    QueryResult, QueryService, ResultCache,
};

pub use api::{build_router, serve, ApiError, AppState};

pub use config::{ApiConfig, Config, ConfigError, DatasetConfig, LogFormat, LoggingConfig};
