//! Dashboard statistics
//!
//! Pure aggregation over a slice of readings: the numbers behind the
//! quick-stat cards (average, time in range, alert count). No state and
//! no clock access, so a summary over the same readings is always the
//! same.

use serde::Serialize;

use crate::classifier::{GlucoseReading, Severity};

/// Aggregate view of a window of readings
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GlucoseSummary {
    /// Readings in the window
    pub count: usize,
    /// Mean glucose in mmol/L, one decimal; `None` when the window is empty
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Share of readings in the normal band, rounded whole percent
    pub time_in_range_pct: f64,
    /// Readings outside the normal band (warnings and criticals)
    pub alerts: usize,
    /// Readings in a critical band
    pub emergencies: usize,
}

impl GlucoseSummary {
    /// Summary of an empty window
    pub fn empty() -> Self {
        Self {
            count: 0,
            average: None,
            min: None,
            max: None,
            time_in_range_pct: 0.0,
            alerts: 0,
            emergencies: 0,
        }
    }
}

/// Summarize a window of readings.
pub fn summarize(readings: &[GlucoseReading]) -> GlucoseSummary {
    if readings.is_empty() {
        return GlucoseSummary::empty();
    }

    let count = readings.len();
    let sum: f64 = readings.iter().map(|r| r.value()).sum();

    let mut min = f64::MAX;
    let mut max = f64::MIN;
    let mut in_range = 0usize;
    let mut alerts = 0usize;
    let mut emergencies = 0usize;

    for reading in readings {
        let v = reading.value();
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
        match reading.severity() {
            Severity::Normal => in_range += 1,
            Severity::Warning => alerts += 1,
            Severity::Critical => {
                alerts += 1;
                emergencies += 1;
            }
        }
    }

    GlucoseSummary {
        count,
        average: Some(round1(sum / count as f64)),
        min: Some(min),
        max: Some(max),
        time_in_range_pct: (in_range as f64 / count as f64 * 100.0).round(),
        alerts,
        emergencies,
    }
}

/// Round to one decimal place, matching the dashboard's display precision
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
