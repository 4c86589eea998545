//! Export Routes
//!
//! Reading export for sharing with a clinician or downstream analysis.
//!
//! - GET /api/v1/export - Readings as a CSV or JSON attachment

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{ExportParams, ReadingDto};
use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::parse_last_window;
use crate::api::state::AppState;
use crate::classifier::GlucoseReading;

/// GET /api/v1/export
///
/// Export retained readings in the requested format. `?last=` limits
/// the window; the response downloads as an attachment.
pub async fn export_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    if !state.config.enable_export {
        return Err(ApiError::Validation(
            "Export feature is disabled".to_string(),
        ));
    }

    let readings = match params.last.as_deref() {
        Some(window) => {
            let since = parse_last_window(window)?;
            state.monitor.history_since(since).await
        }
        None => state.monitor.history().await,
    };

    let format = params.format.to_lowercase();
    let (content_type, extension, body) = match format.as_str() {
        "csv" => ("text/csv", "csv", format_csv(&readings)),
        "json" => ("application/json", "json", format_json(&readings)),
        other => {
            return Err(ApiError::Validation(format!(
                "Unsupported export format '{}': expected csv or json",
                other
            )))
        }
    };

    let filename = format!(
        "glucowatch_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        extension
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                &format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        Body::from(body),
    )
        .into_response())
}

/// Format readings as CSV, one row per reading
fn format_csv(readings: &[GlucoseReading]) -> String {
    let mut csv = String::new();
    csv.push_str("timestamp,mmol,status,severity\n");

    for reading in readings {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            reading.timestamp().to_rfc3339(),
            reading.value(),
            reading.status(),
            reading.severity()
        ));
    }

    csv
}

/// Format readings as a pretty JSON array
fn format_json(readings: &[GlucoseReading]) -> String {
    let records: Vec<ReadingDto> = readings.iter().map(ReadingDto::from).collect();
    serde_json::to_string_pretty(&records).unwrap_or_default()
}
