//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! These types are serialized/deserialized to/from JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertEvent;
use crate::classifier::{GlucoseReading, GlucoseStatus, Severity};
use crate::monitor::{GlucoseSummary, SensorState};

// ============================================
// READING DTOs
// ============================================

/// Reading ingest request
#[derive(Debug, Deserialize)]
pub struct IngestReadingRequest {
    /// Glucose concentration in mmol/L
    pub mmol: f64,
    /// Optional measurement time, defaults to now
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// A classified reading on the wire
///
/// The status, severity and advisory are always derived server-side
/// from the value; clients never supply them.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingDto {
    pub mmol: f64,
    pub status: GlucoseStatus,
    pub severity: Severity,
    pub advisory: &'static str,
    pub emergency: bool,
    pub timestamp: DateTime<Utc>,
}

impl From<&GlucoseReading> for ReadingDto {
    fn from(reading: &GlucoseReading) -> Self {
        Self {
            mmol: reading.value(),
            status: reading.status(),
            severity: reading.severity(),
            advisory: reading.advisory(),
            emergency: reading.is_emergency(),
            timestamp: reading.timestamp(),
        }
    }
}

impl From<GlucoseReading> for ReadingDto {
    fn from(reading: GlucoseReading) -> Self {
        Self::from(&reading)
    }
}

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Relative window like "30m", "2h" or "1d"; omitted means all retained
    #[serde(default)]
    pub last: Option<String>,
}

/// History response
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub count: usize,
    pub readings: Vec<ReadingDto>,
}

// ============================================
// STATS DTOs
// ============================================

/// Stats query parameters
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// Relative window like "30m", "2h" or "1d"; omitted means all retained
    #[serde(default)]
    pub last: Option<String>,
}

/// Stats response: summary plus sensor connectivity
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub sensor: SensorState,
    pub summary: GlucoseSummary,
}

// ============================================
// ALERT DTOs
// ============================================

/// Alert listing parameters
#[derive(Debug, Deserialize)]
pub struct AlertsParams {
    /// Maximum number of alerts to return, newest first
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Alert listing response
#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    /// Alerts in this response
    pub count: usize,
    /// Alerts raised over the server's lifetime
    pub total: u64,
    pub alerts: Vec<AlertEvent>,
}

// ============================================
// PROFILE DTOs
// ============================================

/// Response after changing the medication list
#[derive(Debug, Serialize)]
pub struct MedicationsResponse {
    /// Medications now on the profile
    pub count: usize,
}

// ============================================
// EXPORT DTOs
// ============================================

/// Export query parameters
#[derive(Debug, Deserialize)]
pub struct ExportParams {
    /// Output format: "json" or "csv"
    #[serde(default = "default_export_format")]
    pub format: String,
    /// Relative window like "30m", "2h" or "1d"; omitted means all retained
    #[serde(default)]
    pub last: Option<String>,
}

fn default_export_format() -> String {
    "json".to_string()
}

// ============================================
// THRESHOLD DTOs
// ============================================

/// One classification band with its guidance text
#[derive(Debug, Serialize)]
pub struct BandDto {
    pub status: GlucoseStatus,
    pub severity: Severity,
    pub advisory: &'static str,
}

/// The fixed classification thresholds and bands
#[derive(Debug, Serialize)]
pub struct ThresholdsResponse {
    pub unit: String,
    pub critical_low: f64,
    pub warning_low: f64,
    pub warning_high: f64,
    pub critical_high: f64,
    pub bands: Vec<BandDto>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Sensor connectivity derived from the latest reading
    pub sensor: SensorState,
    /// Readings currently retained
    pub readings: usize,
    /// Connected stream clients
    pub stream_clients: usize,
    pub uptime_seconds: u64,
    pub version: String,
}
