// Trend detector - Flags a sustained pressure change across the fetch window
use crate::domain::sample::{Metric, Sample};
use crate::domain::trend::{TrendClassification, TrendStatus};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSettings {
    /// Valid readings required before any trend is judged
    pub min_readings: usize,
    pub recent_window: usize,
    /// Upper bound on the size of the older window
    pub older_window_max: usize,
    /// Absolute change (hPa) that counts as significant
    pub significant_change: f64,
    /// Nominal reporting interval used to estimate the compared span
    pub assumed_interval_minutes: f64,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            min_readings: 20,
            recent_window: 15,
            older_window_max: 30,
            significant_change: 4.0,
            assumed_interval_minutes: 2.0,
        }
    }
}

/// Compare the latest pressure readings against the earliest ones in the feed.
pub fn detect_pressure_trend(samples: &[Sample], settings: &TrendSettings) -> TrendStatus {
    let readings: Vec<f64> = samples
        .iter()
        .filter_map(|s| s.reading(Metric::Pressure))
        .collect();

    if readings.len() < settings.min_readings || readings.len() <= settings.recent_window {
        tracing::debug!(
            "Not enough pressure readings for a trend: {} of {}",
            readings.len(),
            settings.min_readings
        );
        return TrendStatus::none(0.0);
    }

    let recent = &readings[readings.len() - settings.recent_window..];
    let older_len = settings
        .older_window_max
        .min(readings.len() - settings.recent_window);
    if older_len == 0 {
        return TrendStatus::none(0.0);
    }
    let older = &readings[..older_len];

    let change = mean(recent) - mean(older);
    tracing::debug!("Pressure change across window: {:.2} hPa", change);

    if change.abs() < settings.significant_change {
        return TrendStatus::none(change);
    }

    let span_hours = estimated_span_hours(samples.len(), settings.assumed_interval_minutes);
    let (classification, message) = if change > 0.0 {
        (
            TrendClassification::Rising,
            format!(
                "Sharp pressure rise: +{:.1} hPa over ~{}h - possible weather improvement",
                change, span_hours
            ),
        )
    } else {
        (
            TrendClassification::Falling,
            format!(
                "Sharp pressure drop: {:.1} hPa over ~{}h - possible weather deterioration",
                change, span_hours
            ),
        )
    };

    TrendStatus {
        classification,
        magnitude: change,
        message,
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Approximate hours covered by the window, rounded to one decimal
fn estimated_span_hours(sample_count: usize, interval_minutes: f64) -> f64 {
    (sample_count as f64 * interval_minutes / 60.0 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn pressure_feed(values: &[Option<f64>]) -> Vec<Sample> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                Sample::new(start + TimeDelta::minutes(2 * i as i64)).with_reading(Metric::Pressure, *v)
            })
            .collect()
    }

    #[test]
    fn test_too_few_readings_is_no_signal() {
        let mut values = vec![Some(1000.0); 10];
        values.extend(vec![Some(1050.0); 9]);
        values.extend(vec![None; 20]);

        let status = detect_pressure_trend(&pressure_feed(&values), &TrendSettings::default());

        assert_eq!(status.classification, TrendClassification::None);
    }

    #[test]
    fn test_rising_pressure() {
        let mut values = vec![Some(1000.0); 15];
        values.extend(vec![Some(1010.0); 15]);

        let status = detect_pressure_trend(&pressure_feed(&values), &TrendSettings::default());

        assert_eq!(status.classification, TrendClassification::Rising);
        assert!((status.magnitude - 10.0).abs() < 1e-9);
        assert_eq!(
            status.message,
            "Sharp pressure rise: +10.0 hPa over ~1h - possible weather improvement"
        );
        assert_eq!(status.style_class(), "status-banner rising");
        assert_eq!(status.icon_class(), "fas fa-arrow-up");
    }

    #[test]
    fn test_falling_pressure() {
        let mut values = vec![Some(1012.0); 30];
        values.extend(vec![Some(1006.5); 15]);

        let status = detect_pressure_trend(&pressure_feed(&values), &TrendSettings::default());

        assert_eq!(status.classification, TrendClassification::Falling);
        assert_eq!(
            status.message,
            "Sharp pressure drop: -5.5 hPa over ~1.5h - possible weather deterioration"
        );
        assert_eq!(status.icon_class(), "fas fa-arrow-down");
    }

    #[test]
    fn test_small_change_is_not_significant() {
        let mut values = vec![Some(1000.0); 15];
        values.extend(vec![Some(1003.9); 15]);

        let status = detect_pressure_trend(&pressure_feed(&values), &TrendSettings::default());

        assert!(!status.is_significant());
        assert!(status.message.is_empty());
    }

    #[test]
    fn test_windows_overlap_for_sparse_data() {
        // 20 readings: older window is the first 5, recent window the last 15
        let mut values = vec![Some(1000.0); 5];
        values.extend(vec![Some(1008.0); 15]);

        let status = detect_pressure_trend(&pressure_feed(&values), &TrendSettings::default());

        assert_eq!(status.classification, TrendClassification::Rising);
        assert!((status.magnitude - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_older_window_is_no_signal() {
        let settings = TrendSettings {
            older_window_max: 0,
            ..TrendSettings::default()
        };

        let status = detect_pressure_trend(&pressure_feed(&vec![Some(1013.0); 30]), &settings);

        assert_eq!(status.classification, TrendClassification::None);
        assert!(!status.magnitude.is_nan());
    }
}
