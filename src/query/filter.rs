//! Raw query filter as supplied by a caller.

use serde::{Deserialize, Serialize};

/// Four optional filter fields, exactly as received.
///
/// Nothing here is validated or normalized; see [`crate::query::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Location to match (compared after trim + lowercase)
    #[serde(default)]
    pub location: Option<String>,
    /// Sensor to match (compared after trim + lowercase)
    #[serde(default)]
    pub sensor: Option<String>,
    /// Inclusive lower time bound
    #[serde(default)]
    pub start_date: Option<String>,
    /// Inclusive upper time bound
    #[serde(default)]
    pub end_date: Option<String>,
}

impl QueryFilter {
    /// An unfiltered query (matches every row)
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a location
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Restrict to a sensor
    pub fn sensor(mut self, sensor: impl Into<String>) -> Self {
        self.sensor = Some(sensor.into());
        self
    }

    /// Set the inclusive start bound
    pub fn start_date(mut self, start: impl Into<String>) -> Self {
        self.start_date = Some(start.into());
        self
    }

    /// Set the inclusive end bound
    pub fn end_date(mut self, end: impl Into<String>) -> Self {
        self.end_date = Some(end.into());
        self
    }
}
