// Axis range calculator - Padded y-axis bounds for a conditioned series
use crate::domain::sample::Metric;
use crate::domain::series::{AxisRange, ConditionedSeries};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisPadding {
    /// Minimum padding applied on each side, in display units
    pub floor: f64,
    /// Share of the data range used as padding when larger than `floor`
    pub fraction: f64,
    pub clamp_min: Option<f64>,
    pub clamp_max: Option<f64>,
}

impl AxisPadding {
    pub fn for_metric(metric: Metric) -> Self {
        match metric {
            Metric::Temperature => Self::unclamped(2.0),
            Metric::Humidity => Self {
                clamp_min: Some(0.0),
                clamp_max: Some(100.0),
                ..Self::unclamped(5.0)
            },
            Metric::Pressure => Self::unclamped(10.0),
        }
    }

    fn unclamped(floor: f64) -> Self {
        Self {
            floor,
            fraction: 0.2,
            clamp_min: None,
            clamp_max: None,
        }
    }
}

/// Padded range over the series' present values, or `None` when it has none.
pub fn axis_range(series: &ConditionedSeries, padding: &AxisPadding) -> Option<AxisRange> {
    let (min, max) = series
        .present_values()
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })?;

    let pad = padding.floor.max((max - min) * padding.fraction);
    let mut lower = (min - pad).floor();
    let mut upper = (max + pad).ceil();

    if let Some(clamp_min) = padding.clamp_min {
        lower = lower.max(clamp_min);
    }
    if let Some(clamp_max) = padding.clamp_max {
        upper = upper.min(clamp_max);
    }

    Some(AxisRange::new(lower, upper))
}
