// Render orchestrator - Polling loop that keeps charts and display fields in sync
use crate::application::axis_range::{axis_range, AxisPadding};
use crate::application::feed_fetcher::{FeedFetcher, FeedSource, FetchError};
use crate::application::presenter::present;
use crate::application::render_surface::{ChartHandle, ChartSpec, ChartSurface, DisplaySinks};
use crate::application::series_conditioner::{condition, GapThresholds};
use crate::application::trend_detector::{detect_pressure_trend, TrendSettings};
use crate::domain::sample::{Metric, Sample};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

pub const LOADING_MESSAGE: &str = "Fetching latest data...";
pub const WAITING_MESSAGE: &str =
    "No data received from ThingSpeak yet. Waiting for the first update...";

#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub source: FeedSource,
    pub window_size: usize,
    pub poll_interval: Duration,
    pub gaps: GapThresholds,
    pub padding: HashMap<Metric, AxisPadding>,
    pub trend: TrendSettings,
    pub show_relative_time: bool,
}

impl RenderSettings {
    pub fn padding_for(&self, metric: Metric) -> AxisPadding {
        self.padding
            .get(&metric)
            .copied()
            .unwrap_or_else(|| AxisPadding::for_metric(metric))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Nothing rendered yet; the blocking loader is up
    Loading,
    /// At least one tick rendered; later ticks update in place
    Live,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Rendered { samples: usize, charts: usize },
    Waiting,
    Failed(String),
}

pub struct RenderOrchestrator {
    settings: RenderSettings,
    fetcher: Arc<dyn FeedFetcher>,
    surface: Arc<dyn ChartSurface>,
    sinks: DisplaySinks,
    charts: HashMap<Metric, Box<dyn ChartHandle>>,
    state: RenderState,
}

impl RenderOrchestrator {
    pub fn new(
        settings: RenderSettings,
        fetcher: Arc<dyn FeedFetcher>,
        surface: Arc<dyn ChartSurface>,
        sinks: DisplaySinks,
    ) -> Self {
        Self {
            settings,
            fetcher,
            surface,
            sinks,
            charts: HashMap::new(),
            state: RenderState::Loading,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Poll forever at the configured interval. The first tick fires immediately.
    pub async fn run(mut self) {
        let mut interval = tokio::time::interval(self.settings.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let outcome = self.tick().await;
            tracing::debug!("Tick finished ({:?}): {:?}", self.state(), outcome);
        }
    }

    pub async fn tick(&mut self) -> TickOutcome {
        self.tick_at(Utc::now()).await
    }

    /// One fetch-and-render pass; `now` drives the relative "last updated" text.
    pub async fn tick_at(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.state == RenderState::Loading {
            self.sinks.show_loader(LOADING_MESSAGE);
        }

        let result = self
            .fetcher
            .fetch_latest(&self.settings.source, self.settings.window_size)
            .await;

        let samples = match result {
            Ok(samples) if !samples.is_empty() => samples,
            Ok(_) | Err(FetchError::EmptyResult) => {
                tracing::info!("Feed {} has no entries yet", self.settings.source.channel_id);
                match self.state {
                    RenderState::Loading => self.sinks.show_loader(WAITING_MESSAGE),
                    RenderState::Live => self.sinks.set_fault_notice(WAITING_MESSAGE),
                }
                return TickOutcome::Waiting;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch feed {}: {}", self.settings.source.channel_id, e);
                match self.state {
                    RenderState::Loading => self
                        .sinks
                        .show_loader(&format!("Error: {}. Please check console.", e)),
                    RenderState::Live => self.sinks.set_fault_notice(&format!("Update failed: {}", e)),
                }
                return TickOutcome::Failed(e.to_string());
            }
        };

        let charts = self.render(&samples, now);

        if self.state == RenderState::Loading {
            self.sinks.hide_loader();
            self.surface.set_charts_visible(true);
            self.state = RenderState::Live;
            tracing::info!("Dashboard is live with {} samples", samples.len());
        }
        self.sinks.set_fault_notice("");

        TickOutcome::Rendered {
            samples: samples.len(),
            charts,
        }
    }

    /// Push one feed to every display target; returns the number of charts drawn.
    fn render(&mut self, samples: &[Sample], now: DateTime<Utc>) -> usize {
        if let Some(latest) = samples.last() {
            let current = present(latest, now, self.settings.show_relative_time);
            for metric in Metric::ALL {
                if let Some(text) = current.value(metric) {
                    self.sinks.set_value(metric, text);
                }
            }
            self.sinks.set_last_updated(&current.last_updated);
        }

        let mut drawn = 0;
        for series in condition(samples, &self.settings.gaps) {
            let metric = series.metric;
            let Some(range) = axis_range(&series, &self.settings.padding_for(metric)) else {
                tracing::debug!("Skipping {} chart: no readings in window", metric.id());
                continue;
            };

            if let Some(chart) = self.charts.get_mut(&metric) {
                chart.update(&series, range);
                drawn += 1;
            } else if let Some(chart) =
                self.surface
                    .create_chart(&ChartSpec::for_metric(metric), &series, range)
            {
                self.charts.insert(metric, chart);
                drawn += 1;
            }
        }

        let trend = detect_pressure_trend(samples, &self.settings.trend);
        tracing::debug!(
            "Pressure trend {:?} ({:+.1} hPa)",
            trend.classification,
            trend.magnitude
        );
        if trend.is_significant() {
            self.sinks
                .show_banner(trend.style_class(), &trend.message, trend.icon_class());
        } else {
            self.sinks.hide_banner();
        }

        drawn
    }
}
