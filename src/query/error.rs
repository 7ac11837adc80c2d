//! Query error types
//!
//! Typed outcomes surfaced by the query service. "No matching rows" is not
//! an error; it is a zero-count result.

use thiserror::Error;

/// Errors that can occur while answering a stats query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Caller supplied a date the grammar cannot read
    #[error("Invalid date format: {input}")]
    Validation {
        /// The offending raw input, untrimmed
        input: String,
        /// Which filter field carried it
        field: &'static str,
    },

    /// The dataset has not finished loading
    #[error("Data not loaded")]
    DataUnavailable,
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
