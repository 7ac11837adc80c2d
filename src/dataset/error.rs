//! Dataset error types
//!
//! Errors raised while loading or installing the readings table. All of them
//! are startup faults: the server refuses to start rather than serve a
//! partial table.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building the dataset
#[derive(Error, Debug)]
pub enum DatasetError {
    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV reader failed on the header or framing
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Source file does not exist
    #[error("CSV not found at {0:?}. Place the CSV in the repo or set SENSOR_CSV_PATH")]
    NotFound(PathBuf),

    /// Header row lacks one or more required columns
    #[error("CSV must contain columns: timestamp, location, sensor, value (missing: {})", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// The store already holds a dataset
    #[error("Dataset already loaded")]
    AlreadyLoaded,
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
