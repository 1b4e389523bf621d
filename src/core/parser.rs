// LogView - core/parser.rs
//
// Line-oriented log parsing into `LogRecord`s.
// Core layer: works on strings, never touches the filesystem directly.
//
// Two input shapes are recognised per line:
//   - JSON objects: well-known keys become built-in fields, every other key
//     becomes an attribute.
//   - Plain text: an optional leading RFC 3339 timestamp and level word are
//     lifted out; the remainder is the body.

use crate::core::model::{LogRecord, Severity};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::OnceLock;

const ID_KEYS: &[&str] = &["id", "_id", "log_id"];
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "ts", "@timestamp"];
const SEVERITY_KEYS: &[&str] = &["severity", "severity_text", "level", "lvl"];
const BODY_KEYS: &[&str] = &["body", "message", "msg"];

/// Result of parsing a buffer of lines.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub records: Vec<LogRecord>,
    /// Non-blank lines seen.
    pub lines_processed: u64,
}

/// Parse every non-blank line of `content`.
///
/// Records without an explicit id get `{id_prefix}-{n}`, with `n` counting
/// up from `id_start` over the records produced.
pub fn parse_content(content: &str, id_prefix: &str, id_start: u64) -> ParseResult {
    let mut result = ParseResult::default();
    let mut next = id_start;
    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        result.lines_processed += 1;
        if let Some(record) = parse_line(line, &format!("{id_prefix}-{next}")) {
            result.records.push(record);
            next += 1;
        }
    }
    result
}

/// Parse a single line. Blank lines yield `None`.
pub fn parse_line(line: &str, fallback_id: &str) -> Option<LogRecord> {
    let trimmed = line.trim_end_matches(['\r', '\n']);
    if trimmed.trim().is_empty() {
        return None;
    }

    if trimmed.trim_start().starts_with('{') {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(trimmed) {
            return Some(from_json(map, fallback_id));
        }
    }
    Some(from_text(trimmed, fallback_id))
}

fn from_json(mut map: Map<String, Value>, fallback_id: &str) -> LogRecord {
    let id = take_first(&mut map, ID_KEYS)
        .map(value_to_string)
        .unwrap_or_else(|| fallback_id.to_string());
    let timestamp = take_first(&mut map, TIMESTAMP_KEYS).and_then(|v| json_timestamp(&v));
    let severity = take_first(&mut map, SEVERITY_KEYS)
        .map(|v| Severity::from_level(&value_to_string(v)))
        .unwrap_or_default();
    let body = take_first(&mut map, BODY_KEYS)
        .map(value_to_string)
        .unwrap_or_default();

    let attributes: BTreeMap<String, String> = map
        .into_iter()
        .map(|(k, v)| (k, value_to_string(v)))
        .collect();

    LogRecord {
        id,
        timestamp,
        severity,
        body,
        attributes,
    }
}

/// Remove and return the value of the first key in `keys` that is present.
fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
    keys.iter().find_map(|k| map.remove(*k))
}

/// Strings unquoted, nulls empty, everything else as compact JSON.
fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// RFC 3339 strings, or numeric epochs in seconds, milliseconds, microseconds
/// or nanoseconds, told apart by magnitude.
fn json_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => {
            let raw = n.as_i64()?;
            match raw.abs() {
                0..=99_999_999_999 => Utc.timestamp_opt(raw, 0).single(),
                100_000_000_000..=99_999_999_999_999 => Utc.timestamp_millis_opt(raw).single(),
                100_000_000_000_000..=99_999_999_999_999_999 => {
                    Utc.timestamp_micros(raw).single()
                }
                _ => Some(Utc.timestamp_nanos(raw)),
            }
        }
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn text_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^\s*
            (?:\[?(?P<ts>\d{4}-\d{2}-\d{2}[T\ ]\d{2}:\d{2}:\d{2}(?:[.,]\d+)?(?:Z|[+-]\d{2}:?\d{2})?)\]?\s+)?
            (?:\[?(?P<level>TRACE|DEBUG|INFO|NOTICE|WARN|WARNING|ERROR|ERR|FATAL|CRITICAL|CRIT)\]?[:\s]\s*)?
            (?P<body>.*)$",
        )
        .expect("text line pattern is a valid regex")
    })
}

fn from_text(line: &str, fallback_id: &str) -> LogRecord {
    let mut record = LogRecord::new(fallback_id, line);
    if let Some(caps) = text_pattern().captures(line) {
        if let Some(ts) = caps.name("ts") {
            record.timestamp = parse_timestamp(&ts.as_str().replace(',', "."));
        }
        if let Some(level) = caps.name("level") {
            record.severity = Severity::from_level(level.as_str());
        }
        if record.timestamp.is_some() || caps.name("level").is_some() {
            if let Some(body) = caps.name("body") {
                record.body = body.as_str().to_string();
            }
        }
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_json_line_maps_known_keys() {
        let line = r#"{"id":"abc","timestamp":"2024-03-01T10:20:30Z","level":"error","message":"boom","service":"api","code":500}"#;
        let record = parse_line(line, "fallback").unwrap();
        assert_eq!(record.id, "abc");
        assert_eq!(record.severity, Severity::Error);
        assert_eq!(record.body, "boom");
        assert_eq!(record.timestamp.unwrap().hour(), 10);
        assert_eq!(record.attributes.get("service").map(String::as_str), Some("api"));
        assert_eq!(record.attributes.get("code").map(String::as_str), Some("500"));
        assert!(!record.attributes.contains_key("level"));
    }

    #[test]
    fn test_json_without_id_uses_fallback() {
        let record = parse_line(r#"{"msg":"hi","nested":{"a":1}}"#, "file-7").unwrap();
        assert_eq!(record.id, "file-7");
        assert_eq!(record.body, "hi");
        assert_eq!(
            record.attributes.get("nested").map(String::as_str),
            Some(r#"{"a":1}"#)
        );
    }

    #[test]
    fn test_json_epoch_millis_timestamp() {
        let record = parse_line(r#"{"ts":1709288430000,"body":"x"}"#, "f").unwrap();
        assert_eq!(record.timestamp.unwrap().year(), 2024);
    }

    #[test]
    fn test_json_epoch_micros_and_nanos_timestamp() {
        let micros = parse_line(r#"{"ts":1709288430123456,"body":"x"}"#, "f").unwrap();
        let ts = micros.timestamp.unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.timestamp_subsec_micros(), 123_456);

        let nanos = parse_line(r#"{"ts":1709288430123456789,"body":"x"}"#, "f").unwrap();
        assert_eq!(nanos.timestamp.unwrap().year(), 2024);
    }

    #[test]
    fn test_plain_text_with_timestamp_and_level() {
        let record = parse_line("2024-03-01 10:20:30.123 WARN disk almost full", "f-1").unwrap();
        assert_eq!(record.id, "f-1");
        assert_eq!(record.severity, Severity::Warning);
        assert_eq!(record.body, "disk almost full");
        assert_eq!(record.timestamp.unwrap().minute(), 20);
    }

    #[test]
    fn test_plain_text_without_structure_keeps_whole_line() {
        let record = parse_line("just some words", "f-2").unwrap();
        assert_eq!(record.body, "just some words");
        assert_eq!(record.severity, Severity::Unknown);
        assert!(record.timestamp.is_none());
    }

    #[test]
    fn test_malformed_json_falls_back_to_text() {
        let record = parse_line("{not json", "f-3").unwrap();
        assert_eq!(record.body, "{not json");
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert!(parse_line("   ", "f").is_none());
        let result = parse_content("a\n\n  \nb\n", "app", 10);
        assert_eq!(result.lines_processed, 2);
        let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["app-10", "app-11"]);
    }
}
