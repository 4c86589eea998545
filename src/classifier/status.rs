//! Glucose status bands and the classification function
//!
//! The five clinical risk bands and the threshold logic that maps a
//! glucose concentration (mmol/L) onto them. Classification is pure and
//! total: every finite value resolves to exactly one band.

use serde::{Deserialize, Serialize};

/// Below this the reading is critically low (severe hypoglycemia).
pub const CRITICAL_LOW_MMOL: f64 = 2.8;

/// Below this (and at or above [`CRITICAL_LOW_MMOL`]) the reading is low.
pub const WARNING_LOW_MMOL: f64 = 4.0;

/// Above this (and at or below [`CRITICAL_HIGH_MMOL`]) the reading is high.
pub const WARNING_HIGH_MMOL: f64 = 10.0;

/// Above this the reading is critically high (severe hyperglycemia).
pub const CRITICAL_HIGH_MMOL: f64 = 20.0;

/// Clinical risk band for a glucose reading
///
/// Variants are declared in band order, lowest glucose first. The wire
/// form matches the dashboard's status strings (`critical-low`,
/// `warning-low`, `normal`, `warning-high`, `critical-high`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum GlucoseStatus {
    /// Below 2.8 mmol/L - immediate emergency action required
    CriticalLow,
    /// 2.8 to 4.0 mmol/L (exclusive) - low, corrective action advised
    WarningLow,
    /// 4.0 to 10.0 mmol/L (inclusive) - target range
    Normal,
    /// Above 10.0 up to 20.0 mmol/L (inclusive) - high, corrective action advised
    WarningHigh,
    /// Above 20.0 mmol/L - immediate emergency action required
    CriticalHigh,
}

/// Urgency tier of a status band, as shown on the reading card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

/// Classify a glucose concentration (mmol/L) into its risk band.
///
/// Pure and deterministic. The critical tests run before the warning
/// tests so that band boundaries belong to the stricter band: 1.0 reads
/// `CriticalLow`, not `WarningLow`, and 2.8 exactly reads `WarningLow`.
/// Infinities fall into the critical bands through the same comparisons.
///
/// Callers must pass finite values: NaN fails every threshold comparison
/// and would fall through to `Normal`, so the reading constructors and
/// the ingest API reject non-finite input before it reaches this point.
pub fn classify(mmol: f64) -> GlucoseStatus {
    if mmol < CRITICAL_LOW_MMOL {
        GlucoseStatus::CriticalLow
    } else if mmol > CRITICAL_HIGH_MMOL {
        GlucoseStatus::CriticalHigh
    } else if mmol < WARNING_LOW_MMOL {
        GlucoseStatus::WarningLow
    } else if mmol > WARNING_HIGH_MMOL {
        GlucoseStatus::WarningHigh
    } else {
        GlucoseStatus::Normal
    }
}

impl GlucoseStatus {
    /// All five bands for iteration, in band order
    pub fn all() -> &'static [GlucoseStatus] {
        &[
            GlucoseStatus::CriticalLow,
            GlucoseStatus::WarningLow,
            GlucoseStatus::Normal,
            GlucoseStatus::WarningHigh,
            GlucoseStatus::CriticalHigh,
        ]
    }

    /// Whether this band warrants notifying the emergency contact.
    ///
    /// True only for the two critical bands. This is the sole signal the
    /// alert path and the dashboard use to decide emergency handling.
    pub fn is_emergency(self) -> bool {
        matches!(self, GlucoseStatus::CriticalLow | GlucoseStatus::CriticalHigh)
    }

    /// Fixed clinical guidance text for this band.
    ///
    /// Every band has exactly one advisory; no two bands share one.
    pub fn advisory(self) -> &'static str {
        match self {
            GlucoseStatus::Normal => "Continue monitoring. Maintain your current routine.",
            GlucoseStatus::WarningLow => {
                "Consider having a snack with carbohydrates. Monitor closely."
            }
            GlucoseStatus::WarningHigh => "Check your medication timing. Avoid high-carb foods.",
            GlucoseStatus::CriticalLow => {
                "URGENT: Consume fast-acting glucose immediately. \
                 Contact emergency services if symptoms worsen."
            }
            GlucoseStatus::CriticalHigh => {
                "URGENT: Contact your healthcare provider immediately. \
                 Check ketones if possible."
            }
        }
    }

    /// Urgency tier: normal, warning, or critical
    pub fn severity(self) -> Severity {
        match self {
            GlucoseStatus::Normal => Severity::Normal,
            GlucoseStatus::WarningLow | GlucoseStatus::WarningHigh => Severity::Warning,
            GlucoseStatus::CriticalLow | GlucoseStatus::CriticalHigh => Severity::Critical,
        }
    }
}

impl std::fmt::Display for GlucoseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlucoseStatus::CriticalLow => write!(f, "critical-low"),
            GlucoseStatus::WarningLow => write!(f, "warning-low"),
            GlucoseStatus::Normal => write!(f, "normal"),
            GlucoseStatus::WarningHigh => write!(f, "warning-high"),
            GlucoseStatus::CriticalHigh => write!(f, "critical-high"),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Normal => write!(f, "normal"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}
