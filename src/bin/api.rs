//! Glucowatch API Server
//!
//! Run with: cargo run --bin glucowatch-api
//!
//! # Configuration
//!
//! Loaded from the first of `~/.config/glucowatch/config.toml`,
//! `/etc/glucowatch/config.toml`, `./config.toml`. Environment overrides:
//! - `GLUCOWATCH_API_HOST`: Host to bind to (default: 0.0.0.0)
//! - `GLUCOWATCH_API_PORT`: Port to listen on (default: 8090)
//! - `GLUCOWATCH_HISTORY_CAPACITY`: Readings kept in memory (default: 24)
//! - `GLUCOWATCH_READING_INTERVAL_SECS`: Expected sensor cadence (default: 300)
//! - `RUST_LOG`: Log level (default: info)

use glucowatch::alert::AlertLog;
use glucowatch::api::{serve, ApiConfig, AppState};
use glucowatch::config::Config;
use glucowatch::monitor::{GlucoseMonitor, MonitorConfig};
use glucowatch::profile::ProfileStore;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "glucowatch=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Glucowatch API server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load_default();
    let api_config = api_config_from(&config);
    let monitor_config = monitor_config_from(&config);

    tracing::info!("History capacity: {}", monitor_config.history_capacity);
    tracing::info!("Export endpoint enabled: {}", api_config.enable_export);

    // Initialize monitoring components
    let alerts = Arc::new(AlertLog::new(config.alerts.capacity));
    let profiles = Arc::new(ProfileStore::new());
    let monitor = Arc::new(GlucoseMonitor::new(
        monitor_config,
        Arc::clone(&alerts),
        Arc::clone(&profiles),
    ));

    let state = AppState::new(monitor, profiles, alerts, api_config.clone());

    // Run server
    tracing::info!("Starting server on {}:{}", api_config.host, api_config.port);
    serve(state, &api_config).await?;

    tracing::info!("Glucowatch API server stopped");
    Ok(())
}

/// Map the file/env configuration onto the runtime API config
fn api_config_from(config: &Config) -> ApiConfig {
    ApiConfig {
        host: config.api.host.clone(),
        port: config.api.port,
        cors_origins: config.api.cors_origins.clone(),
        request_timeout_ms: config.api.request_timeout_secs * 1000,
        enable_export: config.api.enable_export,
    }
}

/// Map the file/env configuration onto the runtime monitor config
fn monitor_config_from(config: &Config) -> MonitorConfig {
    MonitorConfig {
        history_capacity: config.monitor.history_capacity,
        stale_after_secs: config.monitor.stale_after_secs(),
    }
}
