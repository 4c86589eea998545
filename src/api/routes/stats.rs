//! Stats Routes
//!
//! Aggregate view of the reading window, the numbers behind the
//! dashboard's quick-stat cards.
//!
//! - GET /api/v1/stats - Summary plus sensor connectivity

use axum::{
    extract::{Query, State},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{StatsParams, StatsResponse};
use crate::api::error::ApiResult;
use crate::api::routes::parse_last_window;
use crate::api::state::AppState;

/// GET /api/v1/stats
///
/// Summary statistics over the retained readings, optionally limited
/// to `?last=30m|2h|1d`.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> ApiResult<Json<StatsResponse>> {
    let since = match params.last.as_deref() {
        Some(window) => Some(parse_last_window(window)?),
        None => None,
    };

    let summary = state.monitor.summary(since).await;
    let sensor = state.monitor.sensor_state().await;

    Ok(Json(StatsResponse { sensor, summary }))
}
