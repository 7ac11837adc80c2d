//! Core dataset types
//!
//! - [`Reading`]: one sensor observation
//! - [`Dataset`]: the immutable readings table, stored column-wise
//! - [`RowRef`]: borrowed view of one row, used by scans

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Canonical form of a location or sensor label: trimmed and lowercased.
pub fn normalize_label(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A single sensor observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// When the observation was taken
    pub timestamp: DateTime<Utc>,
    /// Where the sensor sits (normalized)
    pub location: String,
    /// Sensor kind, e.g. "temperature" (normalized)
    pub sensor: String,
    /// Observed value
    pub value: f64,
}

impl Reading {
    /// Create a reading, normalizing the location and sensor labels
    pub fn new(
        timestamp: DateTime<Utc>,
        location: impl AsRef<str>,
        sensor: impl AsRef<str>,
        value: f64,
    ) -> Self {
        Self {
            timestamp,
            location: normalize_label(location.as_ref()),
            sensor: normalize_label(sensor.as_ref()),
            value,
        }
    }
}

/// Borrowed view of one row of a [`Dataset`]
#[derive(Debug, Clone, Copy)]
pub struct RowRef<'a> {
    pub timestamp: &'a DateTime<Utc>,
    pub location: &'a str,
    pub sensor: &'a str,
    pub value: f64,
}

/// Immutable, column-oriented table of readings.
///
/// Built once by the loader (or [`Dataset::from_readings`] in tests) and
/// never mutated afterwards; shared between request handlers behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    timestamps: Vec<DateTime<Utc>>,
    locations: Vec<String>,
    sensors: Vec<String>,
    values: Vec<f64>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from readings.
    ///
    /// This is the normalizing entry point: labels are trimmed and lowercased
    /// here, so readings built as struct literals are safe to pass in.
    pub fn from_readings(readings: impl IntoIterator<Item = Reading>) -> Self {
        let mut dataset = Self::new();
        for reading in readings {
            dataset.push(Reading::new(
                reading.timestamp,
                reading.location,
                reading.sensor,
                reading.value,
            ));
        }
        dataset
    }

    /// Append a row as-is. Callers pass readings built with [`Reading::new`].
    pub(crate) fn push(&mut self, reading: Reading) {
        self.timestamps.push(reading.timestamp);
        self.locations.push(reading.location);
        self.sensors.push(reading.sensor);
        self.values.push(reading.value);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialize row `index` as an owned reading
    pub fn get(&self, index: usize) -> Option<Reading> {
        self.row(index).map(|row| Reading {
            timestamp: *row.timestamp,
            location: row.location.to_string(),
            sensor: row.sensor.to_string(),
            value: row.value,
        })
    }

    fn row(&self, index: usize) -> Option<RowRef<'_>> {
        Some(RowRef {
            timestamp: self.timestamps.get(index)?,
            location: self.locations.get(index)?,
            sensor: self.sensors.get(index)?,
            value: *self.values.get(index)?,
        })
    }

    /// Iterate over all rows in load order
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> + '_ {
        self.timestamps
            .iter()
            .zip(&self.locations)
            .zip(&self.sensors)
            .zip(&self.values)
            .map(|(((timestamp, location), sensor), value)| RowRef {
                timestamp,
                location,
                sensor,
                value: *value,
            })
    }

    /// Earliest and latest timestamps in the table
    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let min = self.timestamps.iter().min()?;
        let max = self.timestamps.iter().max()?;
        Some((*min, *max))
    }
}
