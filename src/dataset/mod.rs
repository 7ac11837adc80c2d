//! Sensorstats Dataset
//!
//! The readings table the query core runs against:
//!
//! - **types**: `Reading` and the column-oriented `Dataset`
//! - **loader**: CSV loader that validates and normalizes rows
//! - **store**: load-once `DatasetStore` shared by all requests
//! - **error**: Error types
//!
//! # Lifecycle
//!
//! ```text
//! CSV → CsvLoader (drop invalid rows, normalize labels) → Dataset → DatasetStore::install
//! ```
//!
//! The table is immutable once installed, so readers need no locking.

pub mod error;
pub mod loader;
pub mod store;
pub mod types;

pub use error::{DatasetError, DatasetResult};
pub use loader::{load_csv, CsvLoader, LoadReport, REQUIRED_COLUMNS};
pub use store::DatasetStore;
pub use types::{normalize_label, Dataset, Reading, RowRef};
