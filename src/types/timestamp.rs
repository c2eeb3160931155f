//! Lenient timestamp decoding.
//!
//! The service mixes RFC 3339 (`2024-01-02T03:04:05.123Z`), naive ISO
//! (`2024-01-02T03:04:05.123456`) and space-separated forms across endpoints.
//! Anything else decodes to `None` instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d"];

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(raw, fmt)
            .ok()
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(raw, fmt)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
            .map(|naive| Utc.from_utc_datetime(&naive))
    })
}

/// `deserialize_with` helper for `Option<DateTime<Utc>>` fields.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(s)) => parse(&s),
        _ => None,
    })
}
