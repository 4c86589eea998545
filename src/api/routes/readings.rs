//! Reading Routes
//!
//! Endpoints for ingesting and reading back glucose readings.
//!
//! - POST /api/v1/readings - Ingest one reading
//! - GET /api/v1/readings/current - Latest reading
//! - GET /api/v1/readings - Retained history, optional relative window

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::api::dto::{HistoryParams, HistoryResponse, IngestReadingRequest, ReadingDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::parse_last_window;
use crate::api::state::AppState;
use crate::classifier::GlucoseReading;

/// POST /api/v1/readings
///
/// Ingest a single reading. The server classifies the value; the
/// response carries the derived band, advisory and emergency flag.
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IngestReadingRequest>,
) -> ApiResult<(StatusCode, Json<ReadingDto>)> {
    validate_ingest_request(&req)?;

    let reading = match req.timestamp {
        Some(ts) => GlucoseReading::with_timestamp(req.mmol, ts)?,
        None => GlucoseReading::new(req.mmol)?,
    };

    let outcome = state.monitor.record(reading).await;

    Ok((StatusCode::CREATED, Json(ReadingDto::from(outcome.reading))))
}

/// GET /api/v1/readings/current
///
/// The latest recorded reading.
pub async fn current_reading(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ReadingDto>> {
    let reading = state
        .monitor
        .current()
        .await
        .ok_or_else(|| ApiError::NotFound("No readings recorded yet".to_string()))?;

    Ok(Json(ReadingDto::from(reading)))
}

/// GET /api/v1/readings
///
/// Retained readings, oldest first. `?last=30m|2h|1d` restricts the
/// window.
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> ApiResult<Json<HistoryResponse>> {
    let readings = match params.last.as_deref() {
        Some(window) => {
            let since = parse_last_window(window)?;
            state.monitor.history_since(since).await
        }
        None => state.monitor.history().await,
    };

    let readings: Vec<ReadingDto> = readings.iter().map(ReadingDto::from).collect();

    Ok(Json(HistoryResponse {
        count: readings.len(),
        readings,
    }))
}

/// Validate an ingest request
fn validate_ingest_request(req: &IngestReadingRequest) -> ApiResult<()> {
    if !req.mmol.is_finite() {
        return Err(ApiError::Validation(
            "Glucose value must be a finite number".to_string(),
        ));
    }

    // Backfill is allowed within reason; a sensor cannot report the future
    if let Some(ts) = req.timestamp {
        let now = Utc::now();

        if ts < now - Duration::days(30) {
            return Err(ApiError::Validation(
                "Timestamp is more than 30 days in the past".to_string(),
            ));
        }

        if ts > now + Duration::minutes(5) {
            return Err(ApiError::Validation(
                "Timestamp is more than 5 minutes in the future".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ingest_request_valid() {
        let req = IngestReadingRequest {
            mmol: 5.5,
            timestamp: None,
        };
        assert!(validate_ingest_request(&req).is_ok());

        let req = IngestReadingRequest {
            mmol: 5.5,
            timestamp: Some(Utc::now() - Duration::hours(1)),
        };
        assert!(validate_ingest_request(&req).is_ok());
    }

    #[test]
    fn test_validate_ingest_request_non_finite() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let req = IngestReadingRequest {
                mmol: bad,
                timestamp: None,
            };
            assert!(validate_ingest_request(&req).is_err());
        }
    }

    #[test]
    fn test_validate_ingest_request_implausible_timestamps() {
        let req = IngestReadingRequest {
            mmol: 5.5,
            timestamp: Some(Utc::now() - Duration::days(60)),
        };
        assert!(validate_ingest_request(&req).is_err());

        let req = IngestReadingRequest {
            mmol: 5.5,
            timestamp: Some(Utc::now() + Duration::hours(1)),
        };
        assert!(validate_ingest_request(&req).is_err());
    }
}
