//! Lenient accessors over raw dataset items.
//!
//! Scraper actors change their output shape without notice, so every lookup
//! here tolerates missing keys, nulls, wrong types and numeric strings. None of
//! these functions fail; they fall back to an empty string or zero.

use serde_json::Value;

/// Follows a dotted path such as `"authorMeta.name"` through nested objects.
pub(crate) fn lookup<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(item, |current, key| current.as_object()?.get(key))
        .filter(|value| !value.is_null())
}

/// String at `path`. Numbers are rendered (channel and video ids are sometimes
/// numeric); anything else yields `""`.
pub(crate) fn string_at(item: &Value, path: &str) -> String {
    match lookup(item, path) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Non-negative float from a JSON number or a numeric string.
fn non_negative_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed.max(0.0))
}

/// Counter at `path`. Fractional values are truncated, negatives clamp to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn count_at(item: &Value, path: &str) -> u64 {
    let Some(value) = lookup(item, path) else {
        return 0;
    };
    if let Some(n) = value.as_u64() {
        return n;
    }
    non_negative_f64(value).map_or(0, |f| f as u64)
}

/// Duration in seconds at `path`.
///
/// Accepts numbers, numeric strings, and clock strings like `"0:58"` or
/// `"1:02:03"` as some YouTube actors emit.
pub(crate) fn seconds_at(item: &Value, path: &str) -> f64 {
    let Some(value) = lookup(item, path) else {
        return 0.0;
    };
    if let Some(seconds) = non_negative_f64(value) {
        return seconds;
    }
    value.as_str().and_then(parse_clock).unwrap_or(0.0)
}

fn parse_clock(raw: &str) -> Option<f64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        return None;
    }
    parts.iter().try_fold(0.0_f64, |acc, part| {
        let unit = part.trim().parse::<u32>().ok()?;
        Some(acc * 60.0 + f64::from(unit))
    })
}
