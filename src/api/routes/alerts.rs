//! Alert Routes
//!
//! Read access to the emergency alert log.
//!
//! - GET /api/v1/alerts - Recent alerts, newest first

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{AlertsParams, AlertsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// Default number of alerts returned when no limit is given
const DEFAULT_ALERT_LIMIT: usize = 20;

/// GET /api/v1/alerts
///
/// Recent emergency alerts, newest first. `?limit=` caps the count.
pub async fn list_alerts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AlertsParams>,
) -> ApiResult<Json<AlertsResponse>> {
    let limit = params.limit.unwrap_or(DEFAULT_ALERT_LIMIT);
    let alerts = state.alerts.recent(limit).await;

    Ok(Json(AlertsResponse {
        count: alerts.len(),
        total: state.alerts.total().await,
        alerts,
    }))
}
