// Pressure trend domain model
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendClassification {
    None,
    Rising,
    Falling,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendStatus {
    pub classification: TrendClassification,
    pub magnitude: f64,
    pub message: String,
}

impl TrendStatus {
    /// No signal: either the change is insignificant or there is not enough data
    pub fn none(magnitude: f64) -> Self {
        Self {
            classification: TrendClassification::None,
            magnitude,
            message: String::new(),
        }
    }

    pub fn is_significant(&self) -> bool {
        self.classification != TrendClassification::None
    }

    pub fn style_class(&self) -> &'static str {
        match self.classification {
            TrendClassification::Rising => "status-banner rising",
            TrendClassification::Falling => "status-banner falling",
            TrendClassification::None => "status-banner",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self.classification {
            TrendClassification::Rising => "fas fa-arrow-up",
            TrendClassification::Falling => "fas fa-arrow-down",
            TrendClassification::None => "",
        }
    }
}
