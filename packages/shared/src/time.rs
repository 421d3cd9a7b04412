//! Time helpers.
//!
//! Timestamps are carried as Unix milliseconds and rendered in JST for
//! human-facing output.

use chrono::{DateTime, FixedOffset, Utc};

const JST_OFFSET_SECONDS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECONDS).expect("UTC+9 is a valid offset")
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Render a Unix millisecond timestamp as an RFC3339 string in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .with_timezone(&jst())
        .to_rfc3339()
}
