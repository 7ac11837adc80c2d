//! CSV Loader
//!
//! Builds the readings table from a CSV file with a header row naming the
//! columns `timestamp`, `location`, `sensor` and `value` (any order, extra
//! columns ignored). Rows with an unparseable timestamp or value are dropped
//! and reported; a missing column fails the whole load.

use super::error::{DatasetError, DatasetResult};
use super::types::{Dataset, Reading};
use crate::timestamp::parse_timestamp;
use std::io::Read;
use std::path::Path;

/// Columns every source must provide
pub const REQUIRED_COLUMNS: [&str; 4] = ["timestamp", "location", "sensor", "value"];

const DEFAULT_MAX_ERRORS: usize = 100;

/// Summary of a load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Data rows seen in the source
    pub rows_read: usize,
    /// Rows that made it into the table
    pub rows_loaded: usize,
    /// Rows dropped as invalid
    pub rows_dropped: usize,
    /// Line-numbered reasons for dropped rows (truncated)
    pub errors: Vec<String>,
}

/// Column positions resolved from the header row
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    timestamp: usize,
    location: usize,
    sensor: usize,
    value: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> DatasetResult<Self> {
        let names: Vec<&str> = headers.iter().map(str::trim).collect();
        let position = |column: &str| names.iter().position(|name| *name == column);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .into_iter()
            .filter(|column| position(*column).is_none())
            .map(|column| column.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(DatasetError::MissingColumns(missing));
        }

        // All four are present past the check above
        Ok(Self {
            timestamp: position("timestamp").unwrap_or_default(),
            location: position("location").unwrap_or_default(),
            sensor: position("sensor").unwrap_or_default(),
            value: position("value").unwrap_or_default(),
        })
    }
}

/// CSV loader for the readings table
#[derive(Debug, Clone)]
pub struct CsvLoader {
    /// Maximum number of row errors kept in the report
    max_errors: usize,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvLoader {
    /// Create a loader with default settings
    pub fn new() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }

    /// Cap the number of row errors kept in the report
    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Load a dataset from a CSV file
    pub fn load(&self, path: &Path) -> DatasetResult<(Dataset, LoadReport)> {
        if !path.exists() {
            return Err(DatasetError::NotFound(path.to_path_buf()));
        }

        let file = std::fs::File::open(path)?;
        let (dataset, report) = self.load_reader(file)?;

        tracing::info!(
            path = %path.display(),
            rows_loaded = report.rows_loaded,
            rows_dropped = report.rows_dropped,
            "Dataset loaded"
        );

        Ok((dataset, report))
    }

    /// Load from a CSV string (useful for testing)
    pub fn load_str(&self, csv_data: &str) -> DatasetResult<(Dataset, LoadReport)> {
        self.load_reader(csv_data.as_bytes())
    }

    fn load_reader<R: Read>(&self, source: R) -> DatasetResult<(Dataset, LoadReport)> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);

        let columns = ColumnMap::from_headers(reader.headers()?)?;

        let mut dataset = Dataset::new();
        let mut report = LoadReport::default();

        for (line_num, result) in reader.records().enumerate() {
            // Header is line 1
            let actual_line = line_num + 2;
            report.rows_read += 1;

            let outcome = result
                .map_err(|e| e.to_string())
                .and_then(|record| parse_record(&record, columns));

            match outcome {
                Ok(reading) => {
                    dataset.push(reading);
                    report.rows_loaded += 1;
                }
                Err(reason) => {
                    tracing::trace!(line = actual_line, %reason, "Dropping row");
                    report.errors.push(format!("Line {}: {}", actual_line, reason));
                    report.rows_dropped += 1;
                }
            }
        }

        // Truncate errors if too many
        if report.errors.len() > self.max_errors {
            let total = report.errors.len();
            report.errors.truncate(self.max_errors);
            report
                .errors
                .push(format!("... and {} more errors", total - self.max_errors));
        }

        if report.rows_dropped > 0 {
            tracing::warn!(
                rows_dropped = report.rows_dropped,
                "Dropped rows with invalid timestamp or value"
            );
        }

        Ok((dataset, report))
    }
}

fn parse_record(record: &csv::StringRecord, columns: ColumnMap) -> Result<Reading, String> {
    let field = |idx: usize, name: &str| {
        record
            .get(idx)
            .ok_or_else(|| format!("missing {} column", name))
    };

    let ts_str = field(columns.timestamp, "timestamp")?;
    let timestamp = parse_timestamp(ts_str)
        .ok_or_else(|| format!("Could not parse timestamp: {}", ts_str.trim()))?;

    let value_str = field(columns.value, "value")?.trim();
    let value = value_str
        .parse::<f64>()
        .ok()
        .filter(|v| !v.is_nan())
        .ok_or_else(|| format!("Could not parse value: {}", value_str))?;

    let location = field(columns.location, "location")?;
    let sensor = field(columns.sensor, "sensor")?;

    Ok(Reading::new(timestamp, location, sensor, value))
}

/// Load a dataset from `path` with default settings
pub fn load_csv(path: &Path) -> DatasetResult<(Dataset, LoadReport)> {
    CsvLoader::new().load(path)
}
