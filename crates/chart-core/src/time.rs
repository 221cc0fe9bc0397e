// File: crates/chart-core/src/time.rs
// Summary: Timestamp parsing from upstream strings/numbers and display formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::types::Timestamp;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Date formats used by axis ticks and tooltips.
pub const TICK_DATE: &str = "%m/%d/%y";
pub const LONG_DATE: &str = "%B %d, %Y";
pub const SHORT_DATE: &str = "%b %d, %Y";
pub const NUMERIC_DATE: &str = "%-m/%-d/%Y";

/// Parse a date string in any of the upstream layouts. Integer strings are
/// read as epoch seconds or milliseconds (see [`EPOCH_MS_CUTOFF`]).
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return epoch_to_millis(n);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Timestamp from a JSON value (string date or integer epoch).
pub fn timestamp_from_value(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(epoch_to_millis),
        _ => None,
    }
}

/// Integer epochs with a magnitude above this are milliseconds, the rest
/// seconds. Millisecond epochs before 2001-09-09 therefore read as seconds.
pub const EPOCH_MS_CUTOFF: i64 = 1_000_000_000_000;

/// `None` when the instant is outside what chrono can represent.
fn epoch_to_millis(n: i64) -> Option<Timestamp> {
    let ms = if n.abs() > EPOCH_MS_CUTOFF { n } else { n.checked_mul(1_000)? };
    DateTime::from_timestamp_millis(ms).map(|_| ms)
}

pub fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ts)
}

/// Format with a strftime pattern; out-of-range timestamps print as raw millis.
pub fn format_timestamp(ts: Timestamp, fmt: &str) -> String {
    match to_datetime(ts) {
        Some(dt) => dt.format(fmt).to_string(),
        None => ts.to_string(),
    }
}
