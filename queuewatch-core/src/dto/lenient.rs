//! Lenient deserializers for backend payload fields
//!
//! Used with `#[serde(default, deserialize_with = "...")]`. The backend stores
//! integers as strings (`"3"`), writes empty strings for missing values and
//! emits timestamps with or without a zone suffix.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInt {
    Number(u64),
    Text(String),
}

fn is_blank(text: &str) -> bool {
    text.is_empty() || text.eq_ignore_ascii_case("none") || text.eq_ignore_ascii_case("null")
}

/// Optional non-negative integer given as a number or a numeric string
pub fn opt_int<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + FromStr,
    <T as FromStr>::Err: Display,
{
    match Option::<RawInt>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawInt::Number(n)) => T::try_from(n)
            .map(Some)
            .map_err(|_| de::Error::custom(format!("integer {} out of range", n))),
        Some(RawInt::Text(text)) => {
            let text = text.trim();
            if is_blank(text) {
                return Ok(None);
            }
            text.parse::<T>().map(Some).map_err(de::Error::custom)
        }
    }
}

/// Like [`opt_int`], but absent values become zero
pub fn int_or_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64> + FromStr + Default,
    <T as FromStr>::Err: Display,
{
    opt_int(deserializer).map(Option::unwrap_or_default)
}

/// String field that may be sent as a number or omitted
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => text,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Optional timestamp; anything unparseable decodes as `None`
pub fn opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => parse_timestamp(&text),
        _ => None,
    })
}

/// Parses RFC 3339 timestamps, falling back to naive ISO 8601 read as UTC
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if is_blank(text) {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    match NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(_) => {
            tracing::debug!("Ignoring unparseable timestamp {:?}", text);
            None
        }
    }
}
