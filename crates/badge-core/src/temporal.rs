//! # Temporal Helpers: Unix Timestamps and Assertion Dates
//!
//! Badge instances record issue and expiry times as Unix timestamps in
//! seconds. Assertions publish them as calendar dates (`YYYY-MM-DD`),
//! always computed in UTC so the same instant renders identically on every
//! host regardless of its local timezone.

use chrono::{DateTime, Utc};

use crate::error::BadgeError;

/// Current Unix time in seconds.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

/// Format a Unix timestamp as a UTC calendar date, `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns [`BadgeError::Validation`] if the timestamp is outside the range
/// chrono can represent.
pub fn format_date(unix_secs: i64) -> Result<String, BadgeError> {
    let dt: DateTime<Utc> = DateTime::from_timestamp(unix_secs, 0).ok_or_else(|| {
        BadgeError::Validation(format!("invalid Unix timestamp: {unix_secs}"))
    })?;
    Ok(dt.format("%Y-%m-%d").to_string())
}
