//! Live dashboard streaming
//!
//! Pushes readings and alerts to connected dashboards over WebSocket.
//!
//! - **hub**: connection registry and topic pub/sub
//! - **messages**: client and server wire formats
//! - **handler**: axum upgrade handler and connection lifecycle
//!
//! Clients connect to `/ws` and subscribe to any of three topics:
//! `readings` (every recorded reading), `alerts` (emergency alerts) and
//! `system` (server notices). The [`spawn_event_bridge`] task forwards
//! the monitor's broadcast events into the hub.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::monitor::MonitorEvent;

pub mod handler;
pub mod hub;
pub mod messages;

pub use handler::stream_handler;
pub use hub::{ConnectionId, HubConfig, HubError, StreamHub};
pub use messages::{
    ClientMessage, ServerMessage, StreamEvent, TOPIC_ALERTS, TOPIC_READINGS, TOPIC_SYSTEM,
};

/// Forward monitor events into the stream hub.
///
/// Runs until the monitor's event channel closes. A lagged receiver
/// drops the missed events and keeps going; dashboards resynchronize
/// from the history endpoints.
pub fn spawn_event_bridge(
    hub: Arc<StreamHub>,
    mut events: broadcast::Receiver<MonitorEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MonitorEvent::Reading(reading)) => {
                    hub.publish(StreamEvent::reading(&reading)).await;
                }
                Ok(MonitorEvent::Alert(alert)) => {
                    hub.publish(StreamEvent::alert(alert)).await;
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Stream bridge lagged behind monitor events");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("Monitor event channel closed, stream bridge stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertLog;
    use crate::monitor::{GlucoseMonitor, MonitorConfig};
    use crate::profile::ProfileStore;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_bridge_forwards_readings_and_alerts() {
        let monitor = Arc::new(GlucoseMonitor::new(
            MonitorConfig::default(),
            Arc::new(AlertLog::default()),
            Arc::new(ProfileStore::new()),
        ));
        let hub = Arc::new(StreamHub::new(HubConfig::default()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, vec!["readings".to_string(), "alerts".to_string()])
            .await
            .unwrap();

        let bridge = spawn_event_bridge(hub.clone(), monitor.subscribe());

        monitor.record_mmol(1.9).await.unwrap();

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, ServerMessage::Reading { emergency: true, .. }));

        let second = rx.recv().await.unwrap();
        assert!(matches!(second, ServerMessage::Alert(_)));

        bridge.abort();
    }

    #[tokio::test]
    async fn test_bridge_skips_unsubscribed_topics() {
        let monitor = Arc::new(GlucoseMonitor::new(
            MonitorConfig::default(),
            Arc::new(AlertLog::default()),
            Arc::new(ProfileStore::new()),
        ));
        let hub = Arc::new(StreamHub::new(HubConfig::default()));

        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        // Alerts only: routine readings should not arrive
        hub.subscribe(&id, vec!["alerts".to_string()]).await.unwrap();

        let bridge = spawn_event_bridge(hub.clone(), monitor.subscribe());

        monitor.record_mmol(5.5).await.unwrap();
        monitor.record_mmol(22.0).await.unwrap();

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, ServerMessage::Alert(_)));

        bridge.abort();
    }
}
