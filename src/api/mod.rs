//! Glucowatch REST API
//!
//! HTTP API layer exposing the monitor, built with Axum.
//!
//! # Endpoints
//!
//! ## Readings
//! - `POST /api/v1/readings` - Ingest one reading
//! - `GET /api/v1/readings/current` - Latest reading
//! - `GET /api/v1/readings` - Retained history (`?last=30m|2h|1d`)
//!
//! ## Stats
//! - `GET /api/v1/stats` - Summary statistics plus sensor state
//!
//! ## Alerts
//! - `GET /api/v1/alerts` - Recent emergency alerts
//!
//! ## Profile
//! - `GET /api/v1/profile` - Registered patient profile
//! - `PUT /api/v1/profile` - Replace the profile
//! - `POST /api/v1/profile/medications` - Add a medication
//! - `DELETE /api/v1/profile/medications/:index` - Remove a medication
//!
//! ## Export
//! - `GET /api/v1/export` - Readings as CSV or JSON attachment
//!
//! ## Thresholds
//! - `GET /api/v1/thresholds` - Fixed classification bands
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /ws` - Live reading and alert stream
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use glucowatch::alert::AlertLog;
//! use glucowatch::api::{serve, ApiConfig, AppState};
//! use glucowatch::monitor::{GlucoseMonitor, MonitorConfig};
//! use glucowatch::profile::ProfileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let alerts = Arc::new(AlertLog::default());
//!     let profiles = Arc::new(ProfileStore::new());
//!     let monitor = Arc::new(GlucoseMonitor::new(
//!         MonitorConfig::default(),
//!         alerts.clone(),
//!         profiles.clone(),
//!     ));
//!
//!     let config = ApiConfig::default();
//!     let state = AppState::new(monitor, profiles, alerts, config.clone());
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::stream::{spawn_event_bridge, stream_handler, StreamEvent};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = request_timeout_layer(&state.config);

    let api_routes = Router::new()
        // Reading routes
        .route("/readings", post(routes::readings::ingest_reading))
        .route("/readings", get(routes::readings::list_readings))
        .route("/readings/current", get(routes::readings::current_reading))
        // Stats routes
        .route("/stats", get(routes::stats::get_stats))
        // Alert routes
        .route("/alerts", get(routes::alerts::list_alerts))
        // Profile routes
        .route("/profile", get(routes::profile::get_profile))
        .route("/profile", put(routes::profile::put_profile))
        .route("/profile/medications", post(routes::profile::add_medication))
        .route(
            "/profile/medications/:index",
            delete(routes::profile::remove_medication),
        )
        // Export routes
        .route("/export", get(routes::export::export_readings))
        // Threshold routes
        .route("/thresholds", get(routes::thresholds::get_thresholds));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .route("/ws", get(stream_handler))
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .with_state(shared_state)
}

/// Request timeout from the configured limit; slow requests get a 408
fn request_timeout_layer(config: &ApiConfig) -> TimeoutLayer {
    TimeoutLayer::new(Duration::from_millis(config.request_timeout_ms))
}

/// Build the CORS layer from configured origins; empty means permissive
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    if config.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    // Forward monitor events to stream subscribers for the server's lifetime
    let hub = Arc::clone(&state.hub);
    let bridge = spawn_event_bridge(Arc::clone(&hub), state.monitor.subscribe());

    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Glucowatch API listening on {}", addr);

    let result = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Give system subscribers a notice before their sockets close
            hub.publish(StreamEvent::system("server shutting down")).await;
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)));

    bridge.abort();
    result?;

    tracing::info!("Glucowatch API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
