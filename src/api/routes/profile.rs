//! Profile Routes
//!
//! Patient profile management: the registration form's fields, the
//! emergency contact, and the medication list.
//!
//! - GET /api/v1/profile - Registered profile
//! - PUT /api/v1/profile - Replace the profile (validated)
//! - POST /api/v1/profile/medications - Add a medication
//! - DELETE /api/v1/profile/medications/:index - Remove a medication

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::api::dto::MedicationsResponse;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::profile::{Medication, PatientProfile};

/// GET /api/v1/profile
pub async fn get_profile(State(state): State<Arc<AppState>>) -> ApiResult<Json<PatientProfile>> {
    let profile = state
        .profiles
        .get()
        .await
        .ok_or_else(|| ApiError::NotFound("No patient profile registered".to_string()))?;

    Ok(Json(profile))
}

/// PUT /api/v1/profile
///
/// Replace the registered profile. The store validates the form
/// constraints before accepting it.
pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<PatientProfile>,
) -> ApiResult<Json<PatientProfile>> {
    state.profiles.set(profile.clone()).await?;
    Ok(Json(profile))
}

/// POST /api/v1/profile/medications
///
/// Append a medication. Requires name, dosage and frequency.
pub async fn add_medication(
    State(state): State<Arc<AppState>>,
    Json(medication): Json<Medication>,
) -> ApiResult<(StatusCode, Json<MedicationsResponse>)> {
    let count = state.profiles.add_medication(medication).await?;
    Ok((StatusCode::CREATED, Json(MedicationsResponse { count })))
}

/// DELETE /api/v1/profile/medications/:index
///
/// Remove the medication at the given position, returning it.
pub async fn remove_medication(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> ApiResult<Json<Medication>> {
    let removed = state.profiles.remove_medication(index).await?;
    Ok(Json(removed))
}
