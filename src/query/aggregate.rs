//! Aggregation Engine
//!
//! Scans the dataset once, keeps rows matching every present filter
//! dimension, and folds their values into count/avg/min/max.
//!
//! ```text
//! match(row) = (location absent OR row.location == location)
//!          AND (sensor absent   OR row.sensor == sensor)
//!          AND (start absent    OR row.timestamp >= start)
//!          AND (end absent      OR row.timestamp <= end)
//! ```

use crate::dataset::{Dataset, RowRef};
use crate::query::normalize::NormalizedQuery;
use serde::{Deserialize, Serialize};

/// Aggregate over the `value` column of the matching rows.
///
/// `avg`, `min` and `max` are `None` exactly when `count == 0`, so callers can
/// tell "no data" apart from a genuine zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub count: u64,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AggregateResult {
    /// The result for an empty match set
    pub fn empty() -> Self {
        Self {
            count: 0,
            avg: None,
            min: None,
            max: None,
        }
    }

    /// Whether no rows matched
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Running count/sum/min/max
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn finish(self) -> AggregateResult {
        if self.count == 0 {
            return AggregateResult::empty();
        }

        AggregateResult {
            count: self.count,
            avg: Some(self.sum / self.count as f64),
            min: Some(self.min),
            max: Some(self.max),
        }
    }
}

fn matches(row: &RowRef<'_>, query: &NormalizedQuery) -> bool {
    if let Some(location) = query.location() {
        if row.location != location {
            return false;
        }
    }
    if let Some(sensor) = query.sensor() {
        if row.sensor != sensor {
            return false;
        }
    }
    if let Some(start) = query.start() {
        if *row.timestamp < start {
            return false;
        }
    }
    if let Some(end) = query.end() {
        if *row.timestamp > end {
            return false;
        }
    }
    true
}

/// Compute the aggregate for `query` over `dataset`.
///
/// Read-only; safe to call concurrently against a shared dataset.
pub fn aggregate(dataset: &Dataset, query: &NormalizedQuery) -> AggregateResult {
    dataset
        .rows()
        .filter(|row| matches(row, query))
        .fold(Accumulator::new(), |mut acc, row| {
            acc.add(row.value);
            acc
        })
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Reading;
    use crate::query::{normalize, QueryFilter};
    use crate::timestamp::parse_timestamp;

    fn reading(ts: &str, location: &str, sensor: &str, value: f64) -> Reading {
        Reading::new(parse_timestamp(ts).unwrap(), location, sensor, value)
    }

    fn sample() -> Dataset {
        Dataset::from_readings(vec![
            reading("2024-01-01T00:00:00", "lab", "temperature", 1.0),
            reading("2024-01-02T00:00:00", "lab", "temperature", 3.0),
            reading("2024-01-03T00:00:00", "lab", "temperature", 5.0),
            reading("2024-01-02T12:00:00", "lab", "humidity", 40.0),
            reading("2024-01-02T00:00:00", "roof", "temperature", -4.0),
        ])
    }

    fn run(dataset: &Dataset, filter: QueryFilter) -> AggregateResult {
        aggregate(dataset, &normalize(&filter).unwrap())
    }

    #[test]
    fn test_basic_aggregation() {
        let result = run(&sample(), QueryFilter::new().location("lab").sensor("temperature"));
        assert_eq!(
            result,
            AggregateResult {
                count: 3,
                avg: Some(3.0),
                min: Some(1.0),
                max: Some(5.0),
            }
        );
    }

    #[test]
    fn test_no_filters_matches_everything() {
        let result = run(&sample(), QueryFilter::new());
        assert_eq!(result.count, 5);
        assert_eq!(result.min, Some(-4.0));
        assert_eq!(result.max, Some(40.0));
        let avg = result.avg.unwrap();
        assert!((avg - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_filter_labels_are_normalized() {
        let result = run(&sample(), QueryFilter::new().location(" ROOF "));
        assert_eq!(result.count, 1);
        assert_eq!(result.avg, Some(-4.0));
    }

    #[test]
    fn test_empty_match_has_no_values() {
        let result = run(&sample(), QueryFilter::new().location("basement"));
        assert_eq!(result, AggregateResult::empty());
        assert!(result.is_empty());
        assert_eq!(result.avg, None);
        assert_eq!(result.min, None);
        assert_eq!(result.max, None);
    }

    #[test]
    fn test_zero_values_are_not_empty() {
        let dataset = Dataset::from_readings(vec![reading("2024-01-01", "lab", "t", 0.0)]);
        let result = run(&dataset, QueryFilter::new());
        assert_eq!(result.count, 1);
        assert_eq!(result.avg, Some(0.0));
        assert_eq!(result.min, Some(0.0));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let dataset = sample();
        let filter = QueryFilter::new()
            .location("lab")
            .sensor("temperature")
            .start_date("2024-01-01T00:00:00")
            .end_date("2024-01-02");

        let result = run(&dataset, filter);
        assert_eq!(result.count, 2);
        assert_eq!(result.min, Some(1.0));
        assert_eq!(result.max, Some(3.0));
    }

    #[test]
    fn test_start_only_and_end_only() {
        let dataset = sample();

        let after = run(&dataset, QueryFilter::new().sensor("temperature").start_date("2024-01-02"));
        assert_eq!(after.count, 3);

        let before = run(&dataset, QueryFilter::new().sensor("temperature").end_date("2024-01-02"));
        assert_eq!(before.count, 3);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let result = run(
            &sample(),
            QueryFilter::new().start_date("2024-01-03").end_date("2024-01-01"),
        );
        assert_eq!(result, AggregateResult::empty());
    }

    #[test]
    fn test_empty_dataset() {
        let result = run(&Dataset::new(), QueryFilter::new());
        assert_eq!(result, AggregateResult::empty());
    }

    #[test]
    fn test_serializes_absent_values_as_null() {
        let json = serde_json::to_value(AggregateResult::empty()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"count": 0, "avg": null, "min": null, "max": null})
        );
    }
}
