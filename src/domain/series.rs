// Plot-ready series domain models
use super::sample::Metric;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: DateTime<Utc>,
    pub value: Option<f64>,
}

impl SeriesPoint {
    pub fn new(timestamp: DateTime<Utc>, value: Option<f64>) -> Self {
        Self { timestamp, value }
    }
}

/// Per-metric points after gap handling. Timestamps are non-decreasing.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedSeries {
    pub metric: Metric,
    pub points: Vec<SeriesPoint>,
}

impl ConditionedSeries {
    pub fn new(metric: Metric, points: Vec<SeriesPoint>) -> Self {
        Self { metric, points }
    }

    /// Values that are present and finite
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points
            .iter()
            .filter_map(|p| p.value)
            .filter(|v| v.is_finite())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}
