//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::alert::AlertLog;
use crate::monitor::GlucoseMonitor;
use crate::profile::ProfileStore;
use crate::stream::{HubConfig, StreamHub};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// The live glucose monitor
    pub monitor: Arc<GlucoseMonitor>,
    /// Patient profile store
    pub profiles: Arc<ProfileStore>,
    /// Emergency alert log
    pub alerts: Arc<AlertLog>,
    /// Stream hub for live dashboard connections
    pub hub: Arc<StreamHub>,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create state with a default stream hub
    pub fn new(
        monitor: Arc<GlucoseMonitor>,
        profiles: Arc<ProfileStore>,
        alerts: Arc<AlertLog>,
        config: ApiConfig,
    ) -> Self {
        Self {
            monitor,
            profiles,
            alerts,
            hub: Arc::new(StreamHub::new(HubConfig::default())),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Number of connected stream clients
    pub async fn stream_connection_count(&self) -> usize {
        self.hub.connection_count().await
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Allowed CORS origins; empty means allow any
    pub cors_origins: Vec<String>,
    /// Request timeout in milliseconds, enforced by the router's timeout layer
    pub request_timeout_ms: u64,
    /// Enable the export endpoint
    pub enable_export: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8090,
            cors_origins: Vec::new(),
            request_timeout_ms: 30_000,
            enable_export: true,
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
