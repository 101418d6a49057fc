//! Serde helpers for departure times written as `"HH:MM"`
//!
//! Seconds are accepted on input (`"HH:MM:SS"`) but never written.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

const SHORT_FORMAT: &str = "%H:%M";
const LONG_FORMAT: &str = "%H:%M:%S";

/// Serialize a time of day as `"HH:MM"`
pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format(SHORT_FORMAT).to_string())
}

/// Deserialize a time of day from `"HH:MM"` or `"HH:MM:SS"`
pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

/// Parse a time of day from `"HH:MM"` or `"HH:MM:SS"`
pub fn parse(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, SHORT_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, LONG_FORMAT))
        .map_err(|e| format!("Invalid departure time '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long() {
        assert_eq!(parse("08:30").unwrap(), NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(parse("23:59:30").unwrap(), NaiveTime::from_hms_opt(23, 59, 30).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("25:00").is_err());
        assert!(parse("noon").is_err());
    }
}
