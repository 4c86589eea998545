//! Timestamped glucose readings
//!
//! A [`GlucoseReading`] binds a measured concentration to its risk band
//! and the moment it was taken. Readings are immutable once built and
//! the stored band always agrees with [`classify`](super::classify) on
//! the stored value, so construction is the only place validation runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use super::status::{classify, GlucoseStatus, Severity};

/// Error raised when a reading cannot be constructed
#[derive(Error, Debug, PartialEq)]
pub enum ReadingError {
    #[error("glucose value must be a finite number, got {0}")]
    NonFinite(f64),
}

/// A single glucose measurement in mmol/L
///
/// Fields are private: the band is derived from the value at
/// construction and the pair never changes afterwards.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GlucoseReading {
    value: f64,
    status: GlucoseStatus,
    timestamp: DateTime<Utc>,
}

impl GlucoseReading {
    /// Build a reading stamped with the current time.
    ///
    /// Rejects NaN and infinities; sensors report finite concentrations
    /// and anything else indicates a corrupted sample.
    pub fn new(value: f64) -> Result<Self, ReadingError> {
        Self::with_timestamp(value, Utc::now())
    }

    /// Build a reading with an explicit timestamp, for backfill and replay.
    pub fn with_timestamp(value: f64, timestamp: DateTime<Utc>) -> Result<Self, ReadingError> {
        if !value.is_finite() {
            return Err(ReadingError::NonFinite(value));
        }
        Ok(Self {
            value,
            status: classify(value),
            timestamp,
        })
    }

    /// Measured concentration in mmol/L
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Risk band derived from the value at construction
    pub fn status(&self) -> GlucoseStatus {
        self.status
    }

    /// Moment the measurement was taken
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Whether this reading should trigger emergency handling
    pub fn is_emergency(&self) -> bool {
        self.status.is_emergency()
    }

    /// Clinical guidance text for this reading's band
    pub fn advisory(&self) -> &'static str {
        self.status.advisory()
    }

    /// Urgency tier of this reading's band
    pub fn severity(&self) -> Severity {
        self.status.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_reading_derives_status_from_value() {
        let reading = GlucoseReading::new(6.2).unwrap();
        assert_eq!(reading.value(), 6.2);
        assert_eq!(reading.status(), GlucoseStatus::Normal);

        let low = GlucoseReading::new(2.1).unwrap();
        assert_eq!(low.status(), GlucoseStatus::CriticalLow);
    }

    #[test]
    fn test_reading_new_stamps_current_time() {
        let before = Utc::now();
        let reading = GlucoseReading::new(5.5).unwrap();
        let after = Utc::now();
        assert!(reading.timestamp() >= before);
        assert!(reading.timestamp() <= after);
    }

    #[test]
    fn test_reading_with_explicit_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        let reading = GlucoseReading::with_timestamp(4.4, ts).unwrap();
        assert_eq!(reading.timestamp(), ts);
        assert_eq!(reading.status(), GlucoseStatus::Normal);
    }

    #[test]
    fn test_reading_rejects_non_finite_values() {
        assert!(matches!(
            GlucoseReading::new(f64::NAN),
            Err(ReadingError::NonFinite(_))
        ));
        assert_eq!(
            GlucoseReading::new(f64::INFINITY),
            Err(ReadingError::NonFinite(f64::INFINITY))
        );
        assert!(GlucoseReading::new(f64::NEG_INFINITY).is_err());
        assert!(GlucoseReading::with_timestamp(f64::NAN, Utc::now()).is_err());
    }

    #[test]
    fn test_reading_error_is_comparable_for_nan() {
        // NaN != NaN for f64, but the error variant still matches by pattern.
        let err = GlucoseReading::new(f64::NAN).unwrap_err();
        assert!(matches!(err, ReadingError::NonFinite(v) if v.is_nan()));
    }

    #[test]
    fn test_reading_delegates_band_queries() {
        let critical = GlucoseReading::new(22.0).unwrap();
        assert!(critical.is_emergency());
        assert_eq!(critical.severity(), Severity::Critical);
        assert!(critical.advisory().starts_with("URGENT"));

        let normal = GlucoseReading::new(5.0).unwrap();
        assert!(!normal.is_emergency());
        assert_eq!(normal.advisory(), GlucoseStatus::Normal.advisory());
    }

    #[test]
    fn test_reading_serializes_wire_shape() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 8, 30, 0).unwrap();
        let reading = GlucoseReading::with_timestamp(12.5, ts).unwrap();
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["value"], 12.5);
        assert_eq!(json["status"], "warning-high");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2024-03-15T08:30:00"));
    }
}
