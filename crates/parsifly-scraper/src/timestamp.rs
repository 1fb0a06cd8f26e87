//! Publication-time normalization.
//!
//! Accepts epoch seconds, epoch milliseconds and ISO-8601-like strings and
//! produces a [`PostTimestamp`]. Malformed input never fails: the raw value is
//! kept as [`PostTimestamp::Unparsed`] and a warning is logged.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use parsifly_core::PostTimestamp;
use serde_json::Value;

/// Epoch values above this are taken as milliseconds (year ~5138 in seconds).
const EPOCH_MILLIS_THRESHOLD: f64 = 1e11;

/// Naive date-time layouts accepted after RFC 3339 fails. Interpreted as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Normalizes a raw timestamp value from a dataset item.
#[must_use]
pub fn normalize_timestamp(raw: Option<&Value>) -> PostTimestamp {
    match raw {
        None | Some(Value::Null | Value::Bool(false)) => PostTimestamp::Missing,
        Some(Value::Number(n)) => match n.as_f64() {
            Some(secs) if secs.abs() < f64::EPSILON => PostTimestamp::Missing,
            Some(secs) => from_epoch(secs).unwrap_or_else(|| unparsed(&n.to_string())),
            None => unparsed(&n.to_string()),
        },
        Some(Value::String(s)) => normalize_timestamp_str(s),
        Some(other) => unparsed(&other.to_string()),
    }
}

/// Normalizes a timestamp string. Canonical output strings map back to the
/// same instant.
#[must_use]
pub fn normalize_timestamp_str(raw: &str) -> PostTimestamp {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return PostTimestamp::Missing;
    }
    parse_iso(trimmed).map_or_else(|| unparsed(raw), PostTimestamp::Canonical)
}

fn parse_iso(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // Offsets without a colon, e.g. `+0000`.
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[allow(clippy::cast_possible_truncation)]
fn from_epoch(value: f64) -> Option<PostTimestamp> {
    if !value.is_finite() {
        return None;
    }
    // Out-of-range values are rejected by `timestamp_millis_opt`.
    let millis = if value.abs() > EPOCH_MILLIS_THRESHOLD {
        value
    } else {
        value * 1000.0
    };
    Utc.timestamp_millis_opt(millis.round() as i64)
        .single()
        .map(PostTimestamp::Canonical)
}

fn unparsed(raw: &str) -> PostTimestamp {
    tracing::warn!(raw, "unparseable post timestamp; keeping raw value");
    PostTimestamp::Unparsed(raw.to_string())
}
