//! Emergency alerts
//!
//! When a reading lands in a critical band the monitor raises an
//! [`AlertEvent`] here. Events carry everything a responder needs in one
//! snapshot: the reading, the advisory text, and the emergency contact
//! on file at the time. Delivery (SMS, push) is out of scope; the log is
//! surfaced over the API and the live stream.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::classifier::{GlucoseReading, GlucoseStatus};
use crate::profile::EmergencyContact;

/// Default number of alert events kept in memory
pub const DEFAULT_ALERT_CAPACITY: usize = 100;

/// A single emergency alert, frozen at the moment it was raised
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlertEvent {
    pub id: String,
    /// Glucose value that triggered the alert, mmol/L
    pub mmol: f64,
    pub status: GlucoseStatus,
    pub advisory: &'static str,
    /// When the triggering reading was measured
    pub measured_at: DateTime<Utc>,
    /// When the alert was raised
    pub raised_at: DateTime<Utc>,
    /// Emergency contact on file when the alert fired, if registered
    pub contact: Option<EmergencyContact>,
}

impl AlertEvent {
    /// Snapshot an emergency reading into an alert event.
    pub fn for_reading(reading: &GlucoseReading, contact: Option<EmergencyContact>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            mmol: reading.value(),
            status: reading.status(),
            advisory: reading.advisory(),
            measured_at: reading.timestamp(),
            raised_at: Utc::now(),
            contact,
        }
    }
}

/// Bounded in-memory log of raised alerts
///
/// Oldest events are evicted once capacity is reached; `total` keeps
/// counting across evictions.
pub struct AlertLog {
    events: RwLock<VecDeque<AlertEvent>>,
    capacity: usize,
    total: RwLock<u64>,
}

impl AlertLog {
    /// Create a log that retains up to `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            events: RwLock::new(VecDeque::with_capacity(capacity.min(256))),
            capacity: capacity.max(1),
            total: RwLock::new(0),
        }
    }

    /// Raise an alert for an emergency reading.
    ///
    /// The caller decides emergency eligibility via
    /// [`GlucoseStatus::is_emergency`]; the log records whatever it is
    /// handed. Returns the stored event.
    pub async fn raise(
        &self,
        reading: &GlucoseReading,
        contact: Option<EmergencyContact>,
    ) -> AlertEvent {
        let event = AlertEvent::for_reading(reading, contact);

        tracing::warn!(
            alert_id = %event.id,
            mmol = event.mmol,
            status = %event.status,
            contact = event.contact.as_ref().map(|c| c.name.as_str()),
            "Emergency alert raised"
        );

        let mut events = self.events.write().await;
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event.clone());
        *self.total.write().await += 1;

        event
    }

    /// Most recent alerts, newest first, at most `limit`
    pub async fn recent(&self, limit: usize) -> Vec<AlertEvent> {
        let events = self.events.read().await;
        events.iter().rev().take(limit).cloned().collect()
    }

    /// Number of retained alerts raised at or after `since`
    pub async fn count_since(&self, since: DateTime<Utc>) -> usize {
        let events = self.events.read().await;
        events.iter().filter(|e| e.raised_at >= since).count()
    }

    /// Alerts currently retained in the log
    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }

    /// Alerts raised over the lifetime of the log, including evicted ones
    pub async fn total(&self) -> u64 {
        *self.total.read().await
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn critical_reading(mmol: f64) -> GlucoseReading {
        let reading = GlucoseReading::new(mmol).unwrap();
        assert!(reading.is_emergency());
        reading
    }

    #[tokio::test]
    async fn test_raise_records_snapshot() {
        let log = AlertLog::default();
        let reading = critical_reading(1.9);
        let contact = EmergencyContact {
            name: "John Johnson".to_string(),
            phone: "+1 555 0123".to_string(),
        };

        let event = log.raise(&reading, Some(contact.clone())).await;

        assert_eq!(event.mmol, 1.9);
        assert_eq!(event.status, GlucoseStatus::CriticalLow);
        assert_eq!(event.advisory, reading.advisory());
        assert_eq!(event.measured_at, reading.timestamp());
        assert_eq!(event.contact, Some(contact));
        assert!(!event.id.is_empty());

        assert_eq!(log.len().await, 1);
        assert_eq!(log.total().await, 1);
    }

    #[tokio::test]
    async fn test_raise_without_registered_contact() {
        let log = AlertLog::default();
        let event = log.raise(&critical_reading(23.5), None).await;
        assert_eq!(event.status, GlucoseStatus::CriticalHigh);
        assert!(event.contact.is_none());
    }

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let log = AlertLog::default();
        log.raise(&critical_reading(2.0), None).await;
        log.raise(&critical_reading(22.0), None).await;
        log.raise(&critical_reading(1.5), None).await;

        let recent = log.recent(2).await;
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].mmol, 1.5);
        assert_eq!(recent[1].mmol, 22.0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest_but_total_keeps_counting() {
        let log = AlertLog::new(2);
        log.raise(&critical_reading(2.0), None).await;
        log.raise(&critical_reading(2.1), None).await;
        log.raise(&critical_reading(2.2), None).await;

        assert_eq!(log.len().await, 2);
        assert_eq!(log.total().await, 3);

        let recent = log.recent(10).await;
        assert_eq!(recent.len(), 2);
        // 2.0 was evicted
        assert!(recent.iter().all(|e| e.mmol != 2.0));
    }

    #[tokio::test]
    async fn test_count_since() {
        let log = AlertLog::default();
        let before = Utc::now();
        log.raise(&critical_reading(2.0), None).await;
        log.raise(&critical_reading(21.0), None).await;

        assert_eq!(log.count_since(before).await, 2);
        assert_eq!(log.count_since(Utc::now() + chrono::Duration::hours(1)).await, 0);
    }

    #[tokio::test]
    async fn test_alert_serializes_wire_shape() {
        let log = AlertLog::default();
        let event = log.raise(&critical_reading(1.2), None).await;

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["status"], "critical-low");
        assert_eq!(json["mmol"], 1.2);
        assert!(json["advisory"].as_str().unwrap().starts_with("URGENT"));
        assert!(json["contact"].is_null());
    }
}
