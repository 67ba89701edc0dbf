//! Timestamp parsing for the dataset's date fields.
//!
//! Upstream records carry timestamps as UTC strings like
//! `2024-03-01T12:00:00Z`. Filesystem attributes need a [`SystemTime`],
//! and a missing or malformed value must never abort namespace
//! construction, so parsing falls back to the Unix epoch instead of
//! returning an error.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use chrono::NaiveDateTime;

/// Timestamp format used by every date field in the dataset.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse an optional dataset timestamp into a [`SystemTime`].
///
/// Returns the Unix epoch when the value is absent, malformed, or
/// predates the epoch.
///
/// # Arguments
/// * `value` - Raw timestamp string from a dataset record, if present
pub fn parse_timestamp(value: Option<&str>) -> SystemTime {
    value.and_then(to_system_time).unwrap_or(UNIX_EPOCH)
}

fn to_system_time(value: &str) -> Option<SystemTime> {
    let parsed: NaiveDateTime = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()?;
    let secs: i64 = parsed.and_utc().timestamp();
    if secs < 0 {
        return None;
    }
    Some(UNIX_EPOCH + Duration::from_secs(secs as u64))
}
