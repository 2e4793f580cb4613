// Current-value presenter - Display strings for the latest sample
use crate::domain::sample::{Metric, Sample};
use chrono::{DateTime, Local, Utc};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentValues {
    pub values: Vec<(Metric, String)>,
    pub last_updated: String,
}

impl CurrentValues {
    pub fn value(&self, metric: Metric) -> Option<&str> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, text)| text.as_str())
    }
}

pub fn present(latest: &Sample, now: DateTime<Utc>, show_relative_time: bool) -> CurrentValues {
    let values = Metric::ALL
        .iter()
        .map(|&metric| (metric, format_reading(latest.reading(metric), metric.precision())))
        .collect();

    let absolute = latest
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S");
    let last_updated = if show_relative_time {
        format!(
            "Last updated: {} ({})",
            absolute,
            relative_time(latest.timestamp, now)
        )
    } else {
        format!("Last updated: {}", absolute)
    };

    CurrentValues {
        values,
        last_updated,
    }
}

pub fn format_reading(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.*}", precision, v),
        _ => NOT_AVAILABLE.to_string(),
    }
}

fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    let minutes = seconds / 60;
    if minutes < 1 {
        format!("{} seconds ago", seconds)
    } else {
        format!("{} minutes ago", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn latest() -> Sample {
        Sample::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .with_reading(Metric::Temperature, Some(21.46))
            .with_reading(Metric::Pressure, Some(1013.6))
    }

    #[test]
    fn test_formats_with_metric_precision() {
        let sample = latest();
        let current = present(&sample, sample.timestamp, true);

        assert_eq!(current.value(Metric::Temperature), Some("21.5"));
        assert_eq!(current.value(Metric::Pressure), Some("1014"));
    }

    #[test]
    fn test_absent_reading_uses_placeholder() {
        let sample = latest();
        let current = present(&sample, sample.timestamp, true);

        assert_eq!(current.value(Metric::Humidity), Some(NOT_AVAILABLE));
    }

    #[test]
    fn test_relative_time_caption() {
        let sample = latest();

        let current = present(&sample, sample.timestamp + TimeDelta::seconds(42), true);
        assert!(current.last_updated.starts_with("Last updated: "));
        assert!(current.last_updated.ends_with("(42 seconds ago)"));

        let current = present(&sample, sample.timestamp + TimeDelta::seconds(330), true);
        assert!(current.last_updated.ends_with("(5 minutes ago)"));

        let current = present(&sample, sample.timestamp - TimeDelta::seconds(5), true);
        assert!(current.last_updated.ends_with("(0 seconds ago)"));
    }

    #[test]
    fn test_absolute_only_caption() {
        let sample = latest();
        let current = present(&sample, sample.timestamp, false);

        assert!(!current.last_updated.contains("ago"));
    }
}
