//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (ready to serve traffic)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health/live
///
/// Kubernetes liveness probe.
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Kubernetes readiness probe. All state is in-process, so being able
/// to answer at all means the monitor is reachable.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    let _ = state.monitor.sensor_state().await;
    StatusCode::OK
}

/// GET /health
///
/// Full health status with component details. A stale sensor is
/// reported but does not degrade the service itself.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let sensor = state.monitor.sensor_state().await;
    let readings = state.monitor.history().await.len();
    let stream_clients = state.stream_connection_count().await;

    Json(HealthResponse {
        status: "healthy".to_string(),
        sensor,
        readings,
        stream_clients,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }
}
