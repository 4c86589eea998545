//! Stream connection hub
//!
//! Tracks live dashboard connections and which of the three topics each
//! one follows. Publishing fans a message out to every subscriber of
//! its topic over per-connection unbounded channels.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use super::messages::{ServerMessage, StreamEvent, TOPIC_ALERTS, TOPIC_READINGS, TOPIC_SYSTEM};

/// Unique identifier for a stream connection
pub type ConnectionId = String;

/// Errors that can occur in the stream hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("too many connections")]
    TooManyConnections,

    #[error("connection not found")]
    ConnectionNotFound,

    #[error("failed to send message")]
    SendFailed,
}

/// Configuration for the stream hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 100,
        }
    }
}

/// Handle for sending messages to a specific connection
struct ConnectionHandle {
    sender: mpsc::UnboundedSender<ServerMessage>,
    subscriptions: HashSet<String>,
}

/// Manages stream connections and topic subscriptions
pub struct StreamHub {
    connections: Arc<RwLock<HashMap<ConnectionId, ConnectionHandle>>>,
    subscriptions: Arc<RwLock<HashMap<String, HashSet<ConnectionId>>>>,
    config: HubConfig,
}

impl StreamHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            subscriptions: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Register a new connection.
    ///
    /// Returns the connection ID, or an error once the connection limit
    /// is reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections);
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "Stream client connected");
        Ok(id)
    }

    /// Unregister a connection and drop its subscriptions
    pub async fn unregister(&self, id: &str) {
        let handle = self.connections.write().await.remove(id);

        if let Some(handle) = handle {
            let mut subs = self.subscriptions.write().await;
            for topic in handle.subscriptions {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "Stream client disconnected");
    }

    /// Subscribe a connection to topics.
    ///
    /// Unknown topics are ignored; the returned list is what actually
    /// took effect.
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut subscribed = Vec::new();

        for topic in topics {
            if !is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Unknown topic ignored");
                continue;
            }

            handle.subscriptions.insert(topic.clone());
            subs.entry(topic.clone())
                .or_insert_with(HashSet::new)
                .insert(id.to_string());
            subscribed.push(topic);
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(
        &self,
        id: &str,
        topics: Vec<String>,
    ) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut unsubscribed = Vec::new();

        for topic in topics {
            if handle.subscriptions.remove(&topic) {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(connection_id = %id, topics = ?unsubscribed, "Unsubscribed");
        Ok(unsubscribed)
    }

    /// Publish an event to every subscriber of its topic
    pub async fn publish(&self, event: StreamEvent) {
        // Snapshot the subscriber set before touching the connection map;
        // subscribe takes these locks in the opposite order.
        let subscriber_ids: Vec<ConnectionId> = {
            let subs = self.subscriptions.read().await;
            match subs.get(&event.topic) {
                Some(ids) => ids.iter().cloned().collect(),
                None => return,
            }
        };

        let connections = self.connections.read().await;

        let mut sent = 0;
        for id in &subscriber_ids {
            if let Some(handle) = connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent += 1;
                }
            }
        }

        if sent > 0 {
            tracing::trace!(topic = %event.topic, subscribers = sent, "Published event");
        }
    }

    /// Send a message directly to one connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;
        handle.sender.send(message).map_err(|_| HubError::SendFailed)
    }

    /// Current number of connected clients
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Number of connections subscribed to a topic
    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

/// The hub carries exactly three topics
fn is_valid_topic(topic: &str) -> bool {
    topic == TOPIC_READINGS || topic == TOPIC_ALERTS || topic == TOPIC_SYSTEM
}
