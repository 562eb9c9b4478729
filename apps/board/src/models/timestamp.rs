//! Lenient timestamp (de)serialization for display-only fields.
//!
//! The backend's JSON encoder emits HTTP-date strings
//! (`Tue, 14 Oct 2025 10:00:00 GMT`); newer endpoints emit RFC 3339. Both are
//! accepted. Anything else becomes `None` so a single odd value never fails
//! a whole board load.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // Naive ISO timestamps are assumed to be UTC
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
                .map(|naive| naive.and_utc())
                .ok()
        })
}

pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339()),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_http_date() {
        let dt = parse("Tue, 14 Oct 2025 10:30:00 GMT").unwrap();
        assert_eq!(dt.year(), 2025);
        assert_eq!(dt.month(), 10);
        assert_eq!(dt.hour(), 10);
        assert_eq!(dt.minute(), 30);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let dt = parse("2025-10-14T12:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 10);
    }

    #[test]
    fn test_parse_naive_iso_assumed_utc() {
        let dt = parse("2025-10-14T10:30:00.123456").unwrap();
        assert_eq!(dt.hour(), 10);
        assert!(parse("2025-10-14 10:30:00").is_some());
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse("").is_none());
        assert!(parse("yesterday").is_none());
    }
}
