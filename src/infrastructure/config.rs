use crate::application::axis_range::AxisPadding;
use crate::application::feed_fetcher::FeedSource;
use crate::application::render_orchestrator::RenderSettings;
use crate::application::series_conditioner::GapThresholds;
use crate::application::trend_detector::TrendSettings;
use crate::domain::sample::Metric;
use chrono::TimeDelta;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DashboardConfig {
    pub feed: FeedSettings,
    pub polling: PollingSettings,
    pub conditioning: ConditioningSettings,
    pub trend: TrendConfig,
    pub metrics: MetricsConfig,
    pub display: DisplaySettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FeedSettings {
    pub base_url: String,
    pub channel_id: String,
    pub read_api_key: String,
    pub results: usize,
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.thingspeak.com".to_string(),
            channel_id: String::new(),
            read_api_key: String::new(),
            results: 360,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ConditioningSettings {
    pub major_gap_minutes: i64,
    pub minor_gap_minutes: i64,
    pub gap_marker_offset_secs: i64,
}

impl Default for ConditioningSettings {
    fn default() -> Self {
        Self {
            major_gap_minutes: 240,
            minor_gap_minutes: 10,
            gap_marker_offset_secs: 60,
        }
    }
}

impl ConditioningSettings {
    pub fn gap_thresholds(&self) -> anyhow::Result<GapThresholds> {
        let out_of_range = |name: &str| anyhow::anyhow!("conditioning.{} is out of range", name);
        Ok(GapThresholds {
            major: TimeDelta::try_minutes(self.major_gap_minutes)
                .ok_or_else(|| out_of_range("major_gap_minutes"))?,
            minor: TimeDelta::try_minutes(self.minor_gap_minutes)
                .ok_or_else(|| out_of_range("minor_gap_minutes"))?,
            marker_offset: TimeDelta::try_seconds(self.gap_marker_offset_secs)
                .ok_or_else(|| out_of_range("gap_marker_offset_secs"))?,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TrendConfig {
    pub min_readings: usize,
    pub recent_window: usize,
    pub older_window_max: usize,
    pub significant_change: f64,
    pub assumed_interval_minutes: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        let defaults = TrendSettings::default();
        Self {
            min_readings: defaults.min_readings,
            recent_window: defaults.recent_window,
            older_window_max: defaults.older_window_max,
            significant_change: defaults.significant_change,
            assumed_interval_minutes: defaults.assumed_interval_minutes,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub temperature: Option<MetricAxisConfig>,
    #[serde(default)]
    pub humidity: Option<MetricAxisConfig>,
    #[serde(default)]
    pub pressure: Option<MetricAxisConfig>,
}

/// Overrides for a metric's axis padding; unset fields keep the metric default
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricAxisConfig {
    pub padding_floor: Option<f64>,
    pub padding_fraction: Option<f64>,
    pub clamp_min: Option<f64>,
    pub clamp_max: Option<f64>,
}

impl MetricsConfig {
    fn overrides(&self, metric: Metric) -> Option<&MetricAxisConfig> {
        match metric {
            Metric::Temperature => self.temperature.as_ref(),
            Metric::Humidity => self.humidity.as_ref(),
            Metric::Pressure => self.pressure.as_ref(),
        }
    }

    pub fn padding(&self, metric: Metric) -> AxisPadding {
        let defaults = AxisPadding::for_metric(metric);
        match self.overrides(metric) {
            Some(o) => AxisPadding {
                floor: o.padding_floor.unwrap_or(defaults.floor),
                fraction: o.padding_fraction.unwrap_or(defaults.fraction),
                clamp_min: o.clamp_min.or(defaults.clamp_min),
                clamp_max: o.clamp_max.or(defaults.clamp_max),
            },
            None => defaults,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    pub show_relative_time: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_relative_time: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.feed.channel_id.is_empty() {
            anyhow::bail!("feed.channel_id must be set");
        }
        if self.feed.results == 0 {
            anyhow::bail!("feed.results must be greater than zero");
        }
        if self.polling.interval_secs == 0 {
            anyhow::bail!("polling.interval_secs must be greater than zero");
        }

        let gaps = self.conditioning.gap_thresholds()?;
        if gaps.marker_offset <= TimeDelta::zero() || gaps.minor <= TimeDelta::zero() {
            anyhow::bail!("conditioning gap thresholds and marker offset must be positive");
        }
        if gaps.minor <= gaps.marker_offset {
            anyhow::bail!("conditioning.minor_gap_minutes must exceed the gap marker offset");
        }
        if gaps.major <= gaps.minor {
            anyhow::bail!("conditioning.major_gap_minutes must exceed minor_gap_minutes");
        }

        let t = &self.trend;
        if t.recent_window == 0 || t.min_readings <= t.recent_window {
            anyhow::bail!("trend.min_readings must exceed a non-empty trend.recent_window");
        }
        if t.older_window_max == 0 {
            anyhow::bail!("trend.older_window_max must be greater than zero");
        }

        Ok(())
    }

    pub fn render_settings(&self) -> anyhow::Result<RenderSettings> {
        let padding: HashMap<Metric, AxisPadding> = Metric::ALL
            .iter()
            .map(|&m| (m, self.metrics.padding(m)))
            .collect();

        Ok(RenderSettings {
            source: FeedSource {
                channel_id: self.feed.channel_id.clone(),
                read_api_key: self.feed.read_api_key.clone(),
            },
            window_size: self.feed.results,
            poll_interval: Duration::from_secs(self.polling.interval_secs),
            gaps: self.conditioning.gap_thresholds()?,
            padding,
            trend: TrendSettings {
                min_readings: self.trend.min_readings,
                recent_window: self.trend.recent_window,
                older_window_max: self.trend.older_window_max,
                significant_change: self.trend.significant_change,
                assumed_interval_minutes: self.trend.assumed_interval_minutes,
            },
            show_relative_time: self.display.show_relative_time,
        })
    }
}

/// Load `config/dashboard.toml` (optional) overlaid with `DASHBOARD__*` environment variables
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipped_config() -> DashboardConfig {
        toml::from_str(include_str!("../../config/dashboard.toml")).unwrap()
    }

    #[test]
    fn test_shipped_config_is_valid() {
        let config = shipped_config();

        config.validate().unwrap();
        assert_eq!(config.feed.results, 360);
        assert_eq!(config.polling.interval_secs, 60);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [feed]
            channel_id = "42"
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        let settings = config.render_settings().unwrap();
        assert_eq!(settings.gaps, GapThresholds::default());
        assert_eq!(settings.trend, TrendSettings::default());
        assert_eq!(settings.padding_for(Metric::Humidity), AxisPadding::for_metric(Metric::Humidity));
        assert_eq!(settings.poll_interval, Duration::from_secs(60));
        assert!(settings.show_relative_time);
    }

    #[test]
    fn test_metric_override_keeps_unset_defaults() {
        let config: DashboardConfig = toml::from_str(
            r#"
            [feed]
            channel_id = "42"

            [metrics.humidity]
            padding_floor = 8.0
            "#,
        )
        .unwrap();

        let padding = config.metrics.padding(Metric::Humidity);
        assert_eq!(padding.floor, 8.0);
        assert_eq!(padding.fraction, 0.2);
        assert_eq!(padding.clamp_max, Some(100.0));
    }

    #[test]
    fn test_validate_rejects_inconsistent_gaps() {
        let mut config = shipped_config();
        config.conditioning.major_gap_minutes = 5;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config = shipped_config();
        config.polling.interval_secs = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_marker_offset() {
        let mut config = shipped_config();
        config.conditioning.gap_marker_offset_secs = -120;
        assert!(config.validate().is_err());

        config.conditioning.gap_marker_offset_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_minor_gap() {
        let mut config = shipped_config();
        config.conditioning.minor_gap_minutes = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_older_window() {
        let mut config = shipped_config();
        config.trend.older_window_max = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_gaps_are_errors_not_panics() {
        let mut config = shipped_config();
        config.conditioning.major_gap_minutes = i64::MAX;
        assert!(config.validate().is_err());
        assert!(config.render_settings().is_err());

        let mut config = shipped_config();
        config.conditioning.gap_marker_offset_secs = i64::MAX;
        assert!(config.validate().is_err());

        let mut config = shipped_config();
        config.conditioning.minor_gap_minutes = i64::MAX / 2;
        assert!(config.validate().is_err());
    }
}
