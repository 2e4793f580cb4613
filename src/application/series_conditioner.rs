// Series conditioner - Turns a raw feed into plot-ready per-metric series
use crate::domain::sample::{Metric, Sample};
use crate::domain::series::{ConditionedSeries, SeriesPoint};
use chrono::TimeDelta;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GapThresholds {
    /// Gaps above this discard everything before the largest gap
    pub major: TimeDelta,
    /// Gaps above this get a synthetic break point
    pub minor: TimeDelta,
    /// Offset of the break point after the earlier sample
    pub marker_offset: TimeDelta,
}

impl Default for GapThresholds {
    fn default() -> Self {
        Self {
            major: TimeDelta::hours(4),
            minor: TimeDelta::minutes(10),
            marker_offset: TimeDelta::minutes(1),
        }
    }
}

/// Build one conditioned series per metric from an ordered feed.
pub fn condition(samples: &[Sample], thresholds: &GapThresholds) -> Vec<ConditionedSeries> {
    let retained = after_major_outage(samples, thresholds.major);
    let marked = mark_minor_gaps(retained, thresholds);

    Metric::ALL
        .iter()
        .map(|&metric| project(&marked, metric))
        .collect()
}

/// Slice of samples following the largest gap, if that gap is a major outage.
fn after_major_outage(samples: &[Sample], major: TimeDelta) -> &[Sample] {
    if samples.len() < 2 {
        return samples;
    }

    let mut largest_gap = TimeDelta::zero();
    let mut largest_gap_index = None;

    for (i, pair) in samples.windows(2).enumerate() {
        let gap = pair[1].timestamp - pair[0].timestamp;
        if gap > largest_gap {
            largest_gap = gap;
            largest_gap_index = Some(i);
        }
    }

    match largest_gap_index {
        Some(i) if largest_gap > major => {
            tracing::debug!(
                "Discarding {} samples before a {}-minute outage",
                i + 1,
                largest_gap.num_minutes()
            );
            &samples[i + 1..]
        }
        _ => samples,
    }
}

fn mark_minor_gaps(samples: &[Sample], thresholds: &GapThresholds) -> Vec<Sample> {
    let mut marked = Vec::with_capacity(samples.len());

    for (i, sample) in samples.iter().enumerate() {
        marked.push(sample.clone());

        if let Some(next) = samples.get(i + 1) {
            if next.timestamp - sample.timestamp > thresholds.minor {
                marked.push(Sample::gap_marker(sample.timestamp + thresholds.marker_offset));
            }
        }
    }

    marked
}

fn project(samples: &[Sample], metric: Metric) -> ConditionedSeries {
    let points = samples
        .iter()
        .map(|s| SeriesPoint::new(s.timestamp, s.reading(metric)))
        .collect();

    ConditionedSeries::new(metric, points)
}
