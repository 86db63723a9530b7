//! Time helpers. Timestamps are Unix epoch milliseconds.

use chrono::{DateTime, FixedOffset, Utc};

/// JST offset in seconds (UTC+9)
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// Get the current Unix timestamp in milliseconds.
pub fn get_current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as an RFC 3339 string in JST.
///
/// Returns `None` when the timestamp is out of chrono's representable range.
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> Option<String> {
    let jst = FixedOffset::east_opt(JST_OFFSET_SECS)?;
    let utc: DateTime<Utc> = DateTime::from_timestamp_millis(timestamp_millis)?;
    Some(utc.with_timezone(&jst).to_rfc3339())
}
