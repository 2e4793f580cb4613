// Sample and metric domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The fixed set of metrics reported by the weather station feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Temperature,
    Humidity,
    Pressure,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Temperature, Metric::Humidity, Metric::Pressure];

    pub fn id(&self) -> &'static str {
        match self {
            Metric::Temperature => "temperature",
            Metric::Humidity => "humidity",
            Metric::Pressure => "pressure",
        }
    }

    /// Feed field carrying this metric's reading
    pub fn field(&self) -> &'static str {
        match self {
            Metric::Temperature => "field1",
            Metric::Humidity => "field2",
            Metric::Pressure => "field3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
            Metric::Pressure => "Pressure",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Temperature => "°C",
            Metric::Humidity => "%",
            Metric::Pressure => "hPa",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Metric::Temperature => "#FF6384",
            Metric::Humidity => "#36A2EB",
            Metric::Pressure => "#4BC0C0",
        }
    }

    /// Decimal places shown for the current value
    pub fn precision(&self) -> usize {
        match self {
            Metric::Temperature | Metric::Humidity => 1,
            Metric::Pressure => 0,
        }
    }

    /// Tooltip template; `{value}` is substituted by the rendering surface.
    pub fn tooltip_template(&self) -> &'static str {
        match self {
            Metric::Temperature => "Temp: {value}°C",
            Metric::Humidity => "Humidity: {value}%",
            Metric::Pressure => "Pressure: {value} hPa",
        }
    }

    fn index(&self) -> usize {
        match self {
            Metric::Temperature => 0,
            Metric::Humidity => 1,
            Metric::Pressure => 2,
        }
    }
}

/// One timestamped feed entry. A reading is `None` when the source omitted it
/// or sent something that is not a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    readings: [Option<f64>; 3],
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            readings: [None; 3],
        }
    }

    /// Synthetic all-absent point used to break a plotted line across a gap
    pub fn gap_marker(timestamp: DateTime<Utc>) -> Self {
        Self::new(timestamp)
    }

    pub fn with_reading(mut self, metric: Metric, value: Option<f64>) -> Self {
        self.readings[metric.index()] = value.filter(|v| v.is_finite());
        self
    }

    pub fn reading(&self, metric: Metric) -> Option<f64> {
        self.readings[metric.index()]
    }
}
