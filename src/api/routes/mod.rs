//! API Routes
//!
//! Route handlers organized by functionality.

pub mod alerts;
pub mod export;
pub mod health;
pub mod profile;
pub mod readings;
pub mod stats;
pub mod thresholds;

use chrono::{DateTime, Duration, Utc};

use super::error::{ApiError, ApiResult};

/// Parse a relative window like "30m", "2h" or "1d" into its start time.
///
/// Shared by the history, stats and export endpoints.
pub(crate) fn parse_last_window(s: &str) -> ApiResult<DateTime<Utc>> {
    let re = regex::Regex::new(r"^(\d+)([mhd])$")
        .map_err(|_| ApiError::Internal("Regex error".to_string()))?;

    let caps = re.captures(s).ok_or_else(|| {
        ApiError::Validation(format!(
            "Cannot parse window '{}': expected forms like 30m, 2h or 1d",
            s
        ))
    })?;

    let amount: i64 = caps[1]
        .parse()
        .map_err(|_| ApiError::Validation(format!("Invalid number in window '{}'", s)))?;

    // The checked constructors return None on overflow; the regex
    // already restricts the unit to m/h/d.
    let window = match &caps[2] {
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        _ => None,
    }
    .ok_or_else(|| ApiError::Validation(format!("Window '{}' is too large", s)))?;

    Utc::now()
        .checked_sub_signed(window)
        .ok_or_else(|| ApiError::Validation(format!("Window '{}' is too large", s)))
}
