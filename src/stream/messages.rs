//! Stream message types
//!
//! Wire formats for the live dashboard stream: what clients may ask for
//! and what the server pushes. Readings and alerts are flattened into
//! self-contained messages so a dashboard can render a card without a
//! follow-up fetch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::AlertEvent;
use crate::classifier::{GlucoseReading, GlucoseStatus};

/// Topic carrying every recorded reading
pub const TOPIC_READINGS: &str = "readings";
/// Topic carrying emergency alerts
pub const TOPIC_ALERTS: &str = "alerts";
/// Topic carrying server lifecycle notices
pub const TOPIC_SYSTEM: &str = "system";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics for live updates
    Subscribe { topics: Vec<String> },
    /// Unsubscribe from topics
    Unsubscribe { topics: Vec<String> },
    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { connection_id: String },
    /// A reading was recorded
    Reading {
        mmol: f64,
        status: GlucoseStatus,
        advisory: &'static str,
        emergency: bool,
        timestamp: DateTime<Utc>,
    },
    /// An emergency alert was raised
    Alert(AlertEvent),
    /// Subscription confirmed
    Subscribed { topics: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<String> },
    /// Pong response to ping
    Pong,
    /// Server lifecycle notice
    System { message: String },
    /// Error description
    Error { message: String },
}

/// A message bound to the topic it is published on
#[derive(Debug, Clone)]
pub struct StreamEvent {
    pub topic: String,
    pub message: ServerMessage,
}

impl StreamEvent {
    /// Event for a recorded reading
    pub fn reading(reading: &GlucoseReading) -> Self {
        Self {
            topic: TOPIC_READINGS.to_string(),
            message: ServerMessage::Reading {
                mmol: reading.value(),
                status: reading.status(),
                advisory: reading.advisory(),
                emergency: reading.is_emergency(),
                timestamp: reading.timestamp(),
            },
        }
    }

    /// Event for a raised alert
    pub fn alert(event: AlertEvent) -> Self {
        Self {
            topic: TOPIC_ALERTS.to_string(),
            message: ServerMessage::Alert(event),
        }
    }

    /// Event for a server lifecycle notice
    pub fn system(message: &str) -> Self {
        Self {
            topic: TOPIC_SYSTEM.to_string(),
            message: ServerMessage::System {
                message: message.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["readings", "alerts"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics, vec!["readings", "alerts"]);
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_reading_event_serializes_full_card() {
        let reading = GlucoseReading::new(3.1).unwrap();
        let event = StreamEvent::reading(&reading);
        assert_eq!(event.topic, TOPIC_READINGS);

        let json = serde_json::to_value(&event.message).unwrap();
        assert_eq!(json["type"], "reading");
        assert_eq!(json["mmol"], 3.1);
        assert_eq!(json["status"], "warning-low");
        assert_eq!(json["emergency"], false);
        assert!(json["advisory"].as_str().unwrap().contains("snack"));
    }

    #[test]
    fn test_alert_event_serializes_inline() {
        let reading = GlucoseReading::new(22.4).unwrap();
        let alert = AlertEvent::for_reading(&reading, None);
        let event = StreamEvent::alert(alert);
        assert_eq!(event.topic, TOPIC_ALERTS);

        let json = serde_json::to_value(&event.message).unwrap();
        assert_eq!(json["type"], "alert");
        assert_eq!(json["status"], "critical-high");
        assert_eq!(json["mmol"], 22.4);
    }

    #[test]
    fn test_system_event_targets_system_topic() {
        let event = StreamEvent::system("server shutting down");
        assert_eq!(event.topic, TOPIC_SYSTEM);

        let json = serde_json::to_value(&event.message).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["message"], "server shutting down");
    }

    #[test]
    fn test_connected_message_serializes() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }
}
