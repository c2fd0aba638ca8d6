//! Time utilities for rendering transaction time bounds

use chrono::{TimeZone, Utc};

/// Format a unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`
///
/// Returns the raw number for timestamps chrono cannot represent.
///
/// # Examples
/// ```
/// use stellar_txn_inspector::utils::time::format_unix_time;
/// assert_eq!(format_unix_time(0), "1970-01-01 00:00:00 UTC");
/// assert_eq!(format_unix_time(1591833600), "2020-06-11 00:00:00 UTC");
/// ```
pub fn format_unix_time(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Format the upper time bound, where zero means "no upper bound"
pub fn format_max_time(timestamp: u64) -> String {
    if timestamp == 0 {
        "unbounded".to_string()
    } else {
        format_unix_time(timestamp)
    }
}
