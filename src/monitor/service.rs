//! Glucose monitor service
//!
//! `GlucoseMonitor` is the live heart of the service: it accepts
//! readings, keeps the rolling history window, raises emergency alerts,
//! and fans events out to subscribers over a broadcast channel. The API
//! layer and the feed task both talk to the monitor, never to the
//! history or alert log directly.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};

use crate::alert::{AlertEvent, AlertLog};
use crate::classifier::{GlucoseReading, ReadingError};
use crate::profile::ProfileStore;

use super::history::{ReadingHistory, DEFAULT_HISTORY_CAPACITY};
use super::stats::{summarize, GlucoseSummary};

/// Capacity of the monitor's event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tuning knobs for the monitor service
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Readings retained in the rolling window
    pub history_capacity: usize,
    /// Latest reading older than this marks the sensor stale
    pub stale_after_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            // Two missed cycles at the five-minute cadence
            stale_after_secs: 600,
        }
    }
}

/// Sensor connectivity as judged from the latest reading's age
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorState {
    Connected,
    /// No reading yet, or the latest one is older than the threshold
    Stale,
}

impl std::fmt::Display for SensorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorState::Connected => write!(f, "connected"),
            SensorState::Stale => write!(f, "stale"),
        }
    }
}

/// Event fanned out to monitor subscribers
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// Every recorded reading
    Reading(GlucoseReading),
    /// Additionally raised when a recorded reading is an emergency
    Alert(AlertEvent),
}

/// Outcome of recording one reading
#[derive(Debug, Clone, Copy)]
pub struct Recorded {
    pub reading: GlucoseReading,
    pub emergency: bool,
}

/// The live monitoring service
pub struct GlucoseMonitor {
    history: RwLock<ReadingHistory>,
    alerts: Arc<AlertLog>,
    profiles: Arc<ProfileStore>,
    events: broadcast::Sender<MonitorEvent>,
    config: MonitorConfig,
}

impl GlucoseMonitor {
    /// Create a monitor wired to the given alert log and profile store
    pub fn new(config: MonitorConfig, alerts: Arc<AlertLog>, profiles: Arc<ProfileStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            history: RwLock::new(ReadingHistory::new(config.history_capacity)),
            alerts,
            profiles,
            events,
            config,
        }
    }

    /// Record an already-constructed reading.
    ///
    /// Appends to the history, broadcasts a `Reading` event, and, when
    /// the reading is an emergency, raises exactly one alert carrying
    /// the emergency contact currently on file and broadcasts it too.
    pub async fn record(&self, reading: GlucoseReading) -> Recorded {
        self.history.write().await.push(reading);

        tracing::debug!(
            mmol = reading.value(),
            status = %reading.status(),
            "Reading recorded"
        );
        let _ = self.events.send(MonitorEvent::Reading(reading));

        let emergency = reading.is_emergency();
        if emergency {
            let contact = self.profiles.emergency_contact().await;
            let alert = self.alerts.raise(&reading, contact).await;
            let _ = self.events.send(MonitorEvent::Alert(alert));
        }

        Recorded { reading, emergency }
    }

    /// Validate a raw value, stamp it with the current time, and record it.
    pub async fn record_mmol(&self, mmol: f64) -> Result<Recorded, ReadingError> {
        let reading = GlucoseReading::new(mmol)?;
        Ok(self.record(reading).await)
    }

    /// The most recent reading, if any
    pub async fn current(&self) -> Option<GlucoseReading> {
        self.history.read().await.latest().copied()
    }

    /// Retained readings, oldest first
    pub async fn history(&self) -> Vec<GlucoseReading> {
        self.history.read().await.snapshot()
    }

    /// Retained readings measured at or after `since`, oldest first
    pub async fn history_since(&self, since: DateTime<Utc>) -> Vec<GlucoseReading> {
        self.history.read().await.since(since)
    }

    /// Summary statistics, optionally restricted to readings since `since`
    pub async fn summary(&self, since: Option<DateTime<Utc>>) -> GlucoseSummary {
        let window = match since {
            Some(ts) => self.history_since(ts).await,
            None => self.history().await,
        };
        summarize(&window)
    }

    /// Sensor connectivity derived from the latest reading's age
    pub async fn sensor_state(&self) -> SensorState {
        let stale_after = Duration::seconds(self.config.stale_after_secs as i64);
        match self.history.read().await.latest() {
            Some(r) if Utc::now() - r.timestamp() <= stale_after => SensorState::Connected,
            _ => SensorState::Stale,
        }
    }

    /// Subscribe to the monitor's event stream
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::GlucoseStatus;
    use crate::profile::{EmergencyContact, Medication, PatientProfile};

    fn test_monitor() -> GlucoseMonitor {
        GlucoseMonitor::new(
            MonitorConfig::default(),
            Arc::new(AlertLog::default()),
            Arc::new(ProfileStore::new()),
        )
    }

    fn registered_profile() -> PatientProfile {
        PatientProfile {
            first_name: "Sarah".to_string(),
            last_name: "Johnson".to_string(),
            age: 34,
            phone: "+1 555 0100".to_string(),
            emergency_contact: EmergencyContact {
                name: "John Johnson".to_string(),
                phone: "+1 555 0123".to_string(),
            },
            medications: vec![Medication {
                name: "Insulin glargine".to_string(),
                dosage: "10 units".to_string(),
                frequency: "once daily".to_string(),
            }],
            medical_conditions: None,
            allergies: None,
            additional_info: None,
        }
    }

    #[tokio::test]
    async fn test_record_appends_and_current_tracks_latest() {
        let monitor = test_monitor();
        assert!(monitor.current().await.is_none());

        monitor.record_mmol(5.2).await.unwrap();
        let outcome = monitor.record_mmol(6.8).await.unwrap();

        assert!(!outcome.emergency);
        assert_eq!(monitor.current().await.unwrap().value(), 6.8);
        assert_eq!(monitor.history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_record_mmol_rejects_non_finite() {
        let monitor = test_monitor();
        assert!(monitor.record_mmol(f64::NAN).await.is_err());
        assert!(monitor.current().await.is_none());
    }

    #[tokio::test]
    async fn test_emergency_reading_raises_alert_with_contact() {
        let alerts = Arc::new(AlertLog::default());
        let profiles = Arc::new(ProfileStore::new());
        profiles.set(registered_profile()).await.unwrap();

        let monitor = GlucoseMonitor::new(MonitorConfig::default(), alerts.clone(), profiles);

        let outcome = monitor.record_mmol(2.1).await.unwrap();
        assert!(outcome.emergency);
        assert_eq!(outcome.reading.status(), GlucoseStatus::CriticalLow);

        let recent = alerts.recent(10).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].contact.as_ref().unwrap().name, "John Johnson");
    }

    #[tokio::test]
    async fn test_normal_reading_raises_no_alert() {
        let alerts = Arc::new(AlertLog::default());
        let monitor = GlucoseMonitor::new(
            MonitorConfig::default(),
            alerts.clone(),
            Arc::new(ProfileStore::new()),
        );

        monitor.record_mmol(6.0).await.unwrap();
        monitor.record_mmol(11.5).await.unwrap();

        assert!(alerts.is_empty().await);
    }

    #[tokio::test]
    async fn test_every_emergency_reading_raises_one_alert() {
        let alerts = Arc::new(AlertLog::default());
        let monitor = GlucoseMonitor::new(
            MonitorConfig::default(),
            alerts.clone(),
            Arc::new(ProfileStore::new()),
        );

        monitor.record_mmol(2.0).await.unwrap();
        monitor.record_mmol(1.9).await.unwrap();
        monitor.record_mmol(6.0).await.unwrap();
        monitor.record_mmol(22.0).await.unwrap();

        assert_eq!(alerts.total().await, 3);
    }

    #[tokio::test]
    async fn test_subscribers_see_reading_then_alert() {
        let monitor = test_monitor();
        let mut rx = monitor.subscribe();

        monitor.record_mmol(1.5).await.unwrap();

        match rx.recv().await.unwrap() {
            MonitorEvent::Reading(r) => assert_eq!(r.status(), GlucoseStatus::CriticalLow),
            other => panic!("expected Reading event, got {:?}", other),
        }
        match rx.recv().await.unwrap() {
            MonitorEvent::Alert(a) => assert_eq!(a.status, GlucoseStatus::CriticalLow),
            other => panic!("expected Alert event, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_sensor_state_tracks_reading_age() {
        let monitor = test_monitor();
        assert_eq!(monitor.sensor_state().await, SensorState::Stale);

        monitor.record_mmol(5.5).await.unwrap();
        assert_eq!(monitor.sensor_state().await, SensorState::Connected);

        let old = GlucoseReading::with_timestamp(5.5, Utc::now() - Duration::hours(2)).unwrap();
        monitor.record(old).await;
        assert_eq!(monitor.sensor_state().await, SensorState::Stale);
    }

    #[tokio::test]
    async fn test_summary_windows_by_timestamp() {
        let monitor = test_monitor();

        let old = GlucoseReading::with_timestamp(2.0, Utc::now() - Duration::hours(3)).unwrap();
        monitor.record(old).await;
        monitor.record_mmol(6.0).await.unwrap();
        monitor.record_mmol(7.0).await.unwrap();

        let all = monitor.summary(None).await;
        assert_eq!(all.count, 3);
        assert_eq!(all.emergencies, 1);

        let last_hour = monitor.summary(Some(Utc::now() - Duration::hours(1))).await;
        assert_eq!(last_hour.count, 2);
        assert_eq!(last_hour.emergencies, 0);
        assert_eq!(last_hour.time_in_range_pct, 100.0);
    }

    #[tokio::test]
    async fn test_history_respects_configured_capacity() {
        let config = MonitorConfig {
            history_capacity: 3,
            ..MonitorConfig::default()
        };
        let monitor = GlucoseMonitor::new(
            config,
            Arc::new(AlertLog::default()),
            Arc::new(ProfileStore::new()),
        );

        for v in [5.0, 5.1, 5.2, 5.3, 5.4] {
            monitor.record_mmol(v).await.unwrap();
        }

        let history = monitor.history().await;
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].value(), 5.2);
        assert_eq!(monitor.current().await.unwrap().value(), 5.4);
    }
}
