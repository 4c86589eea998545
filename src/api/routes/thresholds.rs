//! Threshold Routes
//!
//! The fixed classification bands, for dashboards drawing reference
//! lines and legends.
//!
//! - GET /api/v1/thresholds

use axum::Json;

use crate::api::dto::{BandDto, ThresholdsResponse};
use crate::classifier::{
    GlucoseStatus, CRITICAL_HIGH_MMOL, CRITICAL_LOW_MMOL, WARNING_HIGH_MMOL, WARNING_LOW_MMOL,
};

/// GET /api/v1/thresholds
///
/// The classification thresholds never change at runtime, so this is a
/// constant response.
pub async fn get_thresholds() -> Json<ThresholdsResponse> {
    let bands = GlucoseStatus::all()
        .iter()
        .map(|&status| BandDto {
            status,
            severity: status.severity(),
            advisory: status.advisory(),
        })
        .collect();

    Json(ThresholdsResponse {
        unit: "mmol/L".to_string(),
        critical_low: CRITICAL_LOW_MMOL,
        warning_low: WARNING_LOW_MMOL,
        warning_high: WARNING_HIGH_MMOL,
        critical_high: CRITICAL_HIGH_MMOL,
        bands,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_thresholds_list_all_five_bands() {
        let Json(response) = get_thresholds().await;

        assert_eq!(response.unit, "mmol/L");
        assert_eq!(response.critical_low, 2.8);
        assert_eq!(response.critical_high, 20.0);
        assert_eq!(response.bands.len(), 5);
        assert_eq!(response.bands[0].status, GlucoseStatus::CriticalLow);
        assert_eq!(response.bands[2].status, GlucoseStatus::Normal);
    }
}
