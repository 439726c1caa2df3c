//! Timestamp parsing and formatting.
//!
//! Snapshots store `event_timestamp` either as a native datetime (cast to
//! string on ingest) or as ISO 8601 text. Parsing is lenient: anything that
//! does not match a known layout is treated as a missing timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string into a naive (UTC) datetime.
///
/// Accepts ISO dates (`2024-01-15`), ISO datetimes with `T` or a space,
/// optional fractional seconds, and RFC 3339 offsets which are normalized
/// to UTC. A trailing ` UTC` suffix (polars string cast) is ignored.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let trimmed = trimmed.strip_suffix(" UTC").unwrap_or(trimmed);

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(with_offset.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// `YYYY-MM-DDTHH:MM:SS[.ffffff]`, fraction only when non-zero.
pub fn format_iso(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}

/// `YYYY-MM-DD HH:MM`, used for trend axes and split labels.
pub fn format_minute(timestamp: &NaiveDateTime) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

/// `YYYY-MM-DD`.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
