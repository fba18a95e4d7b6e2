//! Timestamp value object for immutable points in time.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Immutable point in time, always UTC.
///
/// Deserialization accepts RFC 3339 as well as naive ISO 8601 date-times,
/// which are read as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Parses an RFC 3339 or naive ISO 8601 string.
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| Self(naive.and_utc()))
    }

    /// Returns a new timestamp offset by the given number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + chrono::Duration::seconds(secs))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_secs_moves_forward() {
        let t = Timestamp::now();
        assert!(t.plus_secs(30) > t);
    }

    #[test]
    fn deserializes_rfc3339_with_offset() {
        let t: Timestamp = serde_json::from_str("\"2024-05-01T12:00:00Z\"").unwrap();
        assert_eq!(t.to_string(), "2024-05-01T12:00:00+00:00");
    }

    #[test]
    fn deserializes_naive_iso_as_utc() {
        let t: Timestamp = serde_json::from_str("\"2024-05-01T12:00:00.123456\"").unwrap();
        assert_eq!(t.to_string(), "2024-05-01T12:00:00.123456+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }
}
