//! Shared parser utilities
//!
//! Timestamp formatting, character-count truncation, and JSON
//! re-serialization helpers used by the record classifier.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};
use serde_json::Value;
use std::io;

// ─── Field access ────────────────────────────────────────────────────────────

/// Get a string field from a JSON object, empty string when absent or null.
pub fn str_field(obj: &Value, key: &str) -> String {
    obj.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Get a bool field from a JSON object, false when absent or null.
pub fn bool_field(obj: &Value, key: &str) -> bool {
    obj.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Truthiness of a JSON value: null, false, zero, and empty
/// strings/arrays/objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ─── Truncation ──────────────────────────────────────────────────────────────

/// Truncate a string to at most `max` characters. Counts characters, not
/// bytes, and appends no marker.
pub fn truncate_chars(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    s.chars().take(max).collect()
}

// ─── JSON serialization ──────────────────────────────────────────────────────

/// Single-line JSON with `", "` and `": "` separators.
///
/// The transcript columns carry re-serialized tool inputs and blocks in this
/// shape (together with the manifest's `preserve_order` feature it keeps the
/// byte form of the column stable across runs and readers).
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Serialize a JSON value on one line with spaced separators.
pub fn json_inline(value: &Value) -> String {
    let mut out = Vec::new();
    let mut ser = Serializer::with_formatter(&mut out, SpacedFormatter);
    if value.serialize(&mut ser).is_err() {
        return String::new();
    }
    String::from_utf8(out).unwrap_or_default()
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a record's `timestamp` value for the `time` column.
///
/// Strings are parsed as ISO-8601 (trailing `Z` accepted as UTC) and
/// converted to the local timezone; on parse failure the first 19 characters
/// of the raw string are returned. Numbers above 1e12 are milliseconds since
/// epoch, otherwise seconds; out-of-range values format to empty.
pub fn fmt_ts(ts: &Value) -> String {
    match ts {
        Value::String(s) => match DateTime::parse_from_rfc3339(s) {
            Ok(dt) => dt.with_timezone(&Local).format(TS_FORMAT).to_string(),
            // Offset-less timestamps are taken as local time.
            Err(_) => match parse_naive(s) {
                Some(naive) => naive
                    .and_local_timezone(Local)
                    .earliest()
                    .map(|dt| dt.format(TS_FORMAT).to_string())
                    .unwrap_or_else(|| truncate_chars(s, 19)),
                None => truncate_chars(s, 19),
            },
        },
        Value::Number(n) => n
            .as_f64()
            .filter(|v| *v != 0.0)
            .and_then(epoch_to_local)
            .map(|dt| dt.format(TS_FORMAT).to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Numeric-only time-of-day variant (`HH:MM:SS`), empty for strings.
///
/// Kept for parity with the reference transcoder's public surface; nothing
/// on the output path calls it.
pub fn short_ts(ts: &Value) -> String {
    if let Value::Number(n) = ts {
        if let Some(dt) = n.as_f64().filter(|v| *v != 0.0).and_then(epoch_to_local) {
            return dt.format("%H:%M:%S").to_string();
        }
    }
    String::new()
}

/// Offset-less ISO-8601 forms: `T`-separated, space-separated, date-only.
fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive);
        }
    }
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Epoch value (seconds, or milliseconds when > 1e12) to local time.
fn epoch_to_local(ts: f64) -> Option<DateTime<Local>> {
    if !ts.is_finite() {
        return None;
    }
    let secs = if ts > 1e12 { ts / 1000.0 } else { ts };
    let millis = (secs * 1000.0).round();
    if millis > i64::MAX as f64 || millis < i64::MIN as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.with_timezone(&Local))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
