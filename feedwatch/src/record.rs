//! Decoding of a single feed line into a [`Record`].

use chrono::{NaiveDateTime, Timelike};
use serde_json::{Map, Value};

use crate::{aggregate::Hour, error::ParseError};

/// Format the writer uses for `timestamp`, e.g. `2025-01-29 14:35:20`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Category assigned when a record has none.
pub const DEFAULT_CATEGORY: &str = "other";

/// One parsed feed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub text: Option<String>,
    pub author: Option<String>,
    pub timestamp: String,
    pub category: String,
    pub hour: Hour,
    /// Remaining top-level fields, untouched.
    pub extra: Map<String, Value>,
}

/// Parses one line of the feed.
///
/// The hour is read literally from the timestamp; no timezone is applied.
pub fn parse(line: &str) -> Result<Record, ParseError> {
    let value: Value =
        serde_json::from_str(line).map_err(|e| ParseError::MalformedJson(e.to_string()))?;

    let mut fields = match value {
        Value::Object(map) => map,
        other => {
            return Err(ParseError::MalformedJson(format!(
                "expected an object, got {}",
                json_kind(&other)
            )))
        }
    };

    let timestamp = match fields.remove("timestamp") {
        None | Some(Value::Null) => return Err(ParseError::MissingTimestamp),
        Some(Value::String(s)) if s.is_empty() => return Err(ParseError::MissingTimestamp),
        Some(Value::String(s)) => s,
        Some(other) => {
            return Err(ParseError::InvalidTimestamp {
                value: other.to_string(),
            })
        }
    };

    let hour = parse_hour(&timestamp)?;

    let category = match fields.remove("category") {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        _ => DEFAULT_CATEGORY.to_string(),
    };

    let text = take_string(&mut fields, "text");
    let author = take_string(&mut fields, "author");

    Ok(Record {
        text,
        author,
        timestamp,
        category,
        hour,
        extra: fields,
    })
}

fn parse_hour(timestamp: &str) -> Result<Hour, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        value: timestamp.to_string(),
    };
    if !has_timestamp_shape(timestamp) {
        return Err(invalid());
    }
    let parsed = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).map_err(|_| invalid())?;
    Hour::new(parsed.hour() as u8).ok_or_else(invalid)
}

/// Exactly `YYYY-MM-DD HH:MM:SS`: chrono alone accepts padding and signed years.
fn has_timestamp_shape(timestamp: &str) -> bool {
    let bytes = timestamp.as_bytes();
    bytes.len() == 19
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b' ',
            13 | 16 => *b == b':',
            _ => b.is_ascii_digit(),
        })
}

/// Removes a string field; non-string values stay in `fields` as pass-through.
fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_record() {
        let line = r#"{"text": "I just saw a movie!", "author": "Eve", "timestamp": "2025-01-29 14:35:20", "category": "entertainment", "sentiment": 0.8}"#;
        let record = parse(line).unwrap();

        assert_eq!(record.text.as_deref(), Some("I just saw a movie!"));
        assert_eq!(record.author.as_deref(), Some("Eve"));
        assert_eq!(record.timestamp, "2025-01-29 14:35:20");
        assert_eq!(record.category, "entertainment");
        assert_eq!(record.hour.get(), 14);
        assert_eq!(record.extra.get("sentiment"), Some(&Value::from(0.8)));
    }

    #[test]
    fn test_missing_category_defaults_to_other() {
        let record = parse(r#"{"timestamp": "2025-01-29 14:35:20"}"#).unwrap();
        assert_eq!(record.category, "other");
        assert_eq!(record.hour.get(), 14);
        assert!(record.text.is_none());
        assert!(record.author.is_none());
    }

    #[test]
    fn test_non_string_or_blank_category_defaults_to_other() {
        let numeric = parse(r#"{"timestamp": "2025-01-29 01:00:00", "category": 7}"#).unwrap();
        assert_eq!(numeric.category, "other");

        let blank = parse(r#"{"timestamp": "2025-01-29 01:00:00", "category": "  "}"#).unwrap();
        assert_eq!(blank.category, "other");
    }

    #[test]
    fn test_unknown_category_is_kept() {
        let record = parse(r#"{"timestamp": "2025-01-29 23:59:59", "category": "sports"}"#).unwrap();
        assert_eq!(record.category, "sports");
        assert_eq!(record.hour.get(), 23);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse("{not json"),
            Err(ParseError::MalformedJson(_))
        ));
        assert!(matches!(parse(""), Err(ParseError::MalformedJson(_))));
    }

    #[test]
    fn test_non_object_json_is_malformed() {
        assert!(matches!(
            parse(r#"["2025-01-29 14:35:20"]"#),
            Err(ParseError::MalformedJson(msg)) if msg.contains("array")
        ));
        assert!(matches!(parse("42"), Err(ParseError::MalformedJson(_))));
    }

    #[test]
    fn test_missing_timestamp() {
        assert!(matches!(
            parse(r#"{"category": "tech"}"#),
            Err(ParseError::MissingTimestamp)
        ));
        assert!(matches!(
            parse(r#"{"timestamp": "", "category": "tech"}"#),
            Err(ParseError::MissingTimestamp)
        ));
        assert!(matches!(
            parse(r#"{"timestamp": null}"#),
            Err(ParseError::MissingTimestamp)
        ));
    }

    #[test]
    fn test_invalid_timestamp() {
        for ts in [
            "2025-01-29 99:00:00",
            "2025-01-29T14:35:20",
            "14:35:20",
            "2025-13-01 10:00:00",
            "2025-01-29 14:35:20 extra",
            " 2025-01-29 14:35:20",
            "+2025-01-29 14:35:20",
            "2025-1-29 14:35:20",
            "2025-01-29 4:35:20",
        ] {
            let line = format!(r#"{{"timestamp": "{ts}"}}"#);
            assert!(
                matches!(parse(&line), Err(ParseError::InvalidTimestamp { .. })),
                "{ts} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_string_timestamp_is_invalid() {
        assert!(matches!(
            parse(r#"{"timestamp": 1738161320}"#),
            Err(ParseError::InvalidTimestamp { value }) if value == "1738161320"
        ));
    }

    #[test]
    fn test_non_string_author_is_passed_through() {
        let record = parse(r#"{"timestamp": "2025-01-29 08:00:00", "author": 5}"#).unwrap();
        assert!(record.author.is_none());
        assert_eq!(record.extra.get("author"), Some(&Value::from(5)));
    }

    #[test]
    fn test_hour_is_literal_midnight() {
        let record = parse(r#"{"timestamp": "2025-01-29 00:00:01"}"#).unwrap();
        assert_eq!(record.hour.get(), 0);
    }
}
