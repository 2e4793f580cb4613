// Outbound seams for charts and display fields
use crate::domain::sample::Metric;
use crate::domain::series::{AxisRange, ConditionedSeries};
use std::sync::Arc;

/// Static presentation of one metric chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub metric: Metric,
    pub label: String,
    pub unit: String,
    pub color: String,
    pub fill_color: String,
    pub tooltip_template: String,
    pub tension: f64,
    /// Draw a line across absent values
    pub span_gaps: bool,
}

impl ChartSpec {
    pub fn for_metric(metric: Metric) -> Self {
        Self {
            metric,
            label: metric.label().to_string(),
            unit: metric.unit().to_string(),
            color: metric.color().to_string(),
            fill_color: format!("{}33", metric.color()),
            tooltip_template: metric.tooltip_template().to_string(),
            tension: 0.4,
            span_gaps: false,
        }
    }
}

/// A live chart, replaced in place on every tick
pub trait ChartHandle: Send {
    fn update(&mut self, series: &ConditionedSeries, range: AxisRange);
}

pub trait ChartSurface: Send + Sync {
    /// Create a chart, or `None` when the surface has nowhere to draw it
    fn create_chart(
        &self,
        spec: &ChartSpec,
        series: &ConditionedSeries,
        range: AxisRange,
    ) -> Option<Box<dyn ChartHandle>>;

    fn set_charts_visible(&self, visible: bool);
}

pub trait TextSink: Send + Sync {
    fn set_text(&self, text: &str);
}

pub trait LoaderSink: Send + Sync {
    fn show(&self, message: &str);
    fn hide(&self);
}

pub trait BannerSink: Send + Sync {
    fn show(&self, style_class: &str, message: &str, icon_class: &str);
    fn hide(&self);
}

/// Display targets; any of them may be absent, in which case writes are dropped.
#[derive(Clone, Default)]
pub struct DisplaySinks {
    pub temperature: Option<Arc<dyn TextSink>>,
    pub humidity: Option<Arc<dyn TextSink>>,
    pub pressure: Option<Arc<dyn TextSink>>,
    pub last_updated: Option<Arc<dyn TextSink>>,
    pub fault_notice: Option<Arc<dyn TextSink>>,
    pub loader: Option<Arc<dyn LoaderSink>>,
    pub banner: Option<Arc<dyn BannerSink>>,
}

impl DisplaySinks {
    pub fn value_sink(&self, metric: Metric) -> Option<&Arc<dyn TextSink>> {
        match metric {
            Metric::Temperature => self.temperature.as_ref(),
            Metric::Humidity => self.humidity.as_ref(),
            Metric::Pressure => self.pressure.as_ref(),
        }
    }

    pub fn set_value(&self, metric: Metric, text: &str) {
        if let Some(sink) = self.value_sink(metric) {
            sink.set_text(text);
        }
    }

    pub fn set_last_updated(&self, text: &str) {
        if let Some(sink) = &self.last_updated {
            sink.set_text(text);
        }
    }

    pub fn set_fault_notice(&self, text: &str) {
        if let Some(sink) = &self.fault_notice {
            sink.set_text(text);
        }
    }

    pub fn show_loader(&self, message: &str) {
        if let Some(loader) = &self.loader {
            loader.show(message);
        }
    }

    pub fn hide_loader(&self) {
        if let Some(loader) = &self.loader {
            loader.hide();
        }
    }

    pub fn show_banner(&self, style_class: &str, message: &str, icon_class: &str) {
        if let Some(banner) = &self.banner {
            banner.show(style_class, message, icon_class);
        }
    }

    pub fn hide_banner(&self) {
        if let Some(banner) = &self.banner {
            banner.hide();
        }
    }
}
