// In-memory display surface backing the dashboard endpoint
use crate::application::render_orchestrator::LOADING_MESSAGE;
use crate::application::render_surface::{
    BannerSink, ChartHandle, ChartSpec, ChartSurface, DisplaySinks, LoaderSink, TextSink,
};
use crate::domain::sample::Metric;
use crate::domain::series::{AxisRange, ConditionedSeries, SeriesPoint};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

#[derive(Debug, Clone, Serialize)]
pub struct LoaderView {
    pub visible: bool,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BannerView {
    pub visible: bool,
    pub style_class: String,
    pub message: String,
    pub icon_class: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub label: String,
    pub unit: String,
    pub color: String,
    pub fill_color: String,
    pub tooltip_template: String,
    pub tension: f64,
    pub span_gaps: bool,
    pub y_min: f64,
    pub y_max: f64,
    pub points: Vec<SeriesPoint>,
    /// Number of times the chart data was written
    pub revision: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub loader: LoaderView,
    pub charts_visible: bool,
    pub current_values: BTreeMap<String, String>,
    pub last_updated: String,
    pub fault_notice: String,
    pub banner: BannerView,
    pub charts: BTreeMap<String, ChartView>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self {
            loader: LoaderView {
                visible: true,
                message: LOADING_MESSAGE.to_string(),
            },
            charts_visible: false,
            current_values: BTreeMap::new(),
            last_updated: String::new(),
            fault_notice: String::new(),
            banner: BannerView::default(),
            charts: BTreeMap::new(),
        }
    }
}

/// Shared handle to the page state. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    state: Arc<RwLock<DashboardSnapshot>>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Every display target wired to this view
    pub fn sinks(&self) -> DisplaySinks {
        let text = |field: TextField| -> Arc<dyn TextSink> {
            Arc::new(ViewText {
                view: self.clone(),
                field,
            })
        };

        DisplaySinks {
            temperature: Some(text(TextField::Value(Metric::Temperature))),
            humidity: Some(text(TextField::Value(Metric::Humidity))),
            pressure: Some(text(TextField::Value(Metric::Pressure))),
            last_updated: Some(text(TextField::LastUpdated)),
            fault_notice: Some(text(TextField::FaultNotice)),
            loader: Some(Arc::new(self.clone())),
            banner: Some(Arc::new(self.clone())),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, DashboardSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy)]
enum TextField {
    Value(Metric),
    LastUpdated,
    FaultNotice,
}

struct ViewText {
    view: DashboardView,
    field: TextField,
}

impl TextSink for ViewText {
    fn set_text(&self, text: &str) {
        let mut state = self.view.write();
        match self.field {
            TextField::Value(metric) => {
                state
                    .current_values
                    .insert(metric.id().to_string(), text.to_string());
            }
            TextField::LastUpdated => state.last_updated = text.to_string(),
            TextField::FaultNotice => state.fault_notice = text.to_string(),
        }
    }
}

impl LoaderSink for DashboardView {
    fn show(&self, message: &str) {
        let mut state = self.write();
        state.loader.visible = true;
        state.loader.message = message.to_string();
    }

    fn hide(&self) {
        self.write().loader.visible = false;
    }
}

impl BannerSink for DashboardView {
    fn show(&self, style_class: &str, message: &str, icon_class: &str) {
        self.write().banner = BannerView {
            visible: true,
            style_class: style_class.to_string(),
            message: message.to_string(),
            icon_class: icon_class.to_string(),
        };
    }

    fn hide(&self) {
        self.write().banner.visible = false;
    }
}

impl ChartSurface for DashboardView {
    fn create_chart(
        &self,
        spec: &ChartSpec,
        series: &ConditionedSeries,
        range: AxisRange,
    ) -> Option<Box<dyn ChartHandle>> {
        let chart = ChartView {
            label: spec.label.clone(),
            unit: spec.unit.clone(),
            color: spec.color.clone(),
            fill_color: spec.fill_color.clone(),
            tooltip_template: spec.tooltip_template.clone(),
            tension: spec.tension,
            span_gaps: spec.span_gaps,
            y_min: range.min,
            y_max: range.max,
            points: series.points.clone(),
            revision: 1,
        };
        self.write()
            .charts
            .insert(spec.metric.id().to_string(), chart);

        Some(Box::new(ViewChart {
            view: self.clone(),
            metric: spec.metric,
        }))
    }

    fn set_charts_visible(&self, visible: bool) {
        self.write().charts_visible = visible;
    }
}

struct ViewChart {
    view: DashboardView,
    metric: Metric,
}

impl ChartHandle for ViewChart {
    fn update(&mut self, series: &ConditionedSeries, range: AxisRange) {
        let mut state = self.view.write();
        if let Some(chart) = state.charts.get_mut(self.metric.id()) {
            chart.points = series.points.clone();
            chart.y_min = range.min;
            chart.y_max = range.max;
            chart.revision += 1;
        }
    }
}
