//! # Temporal Types — UTC-Only Timestamps
//!
//! `Timestamp` records when a validation verdict was produced. It is UTC,
//! truncated to seconds, and always renders as `YYYY-MM-DDTHH:MM:SSZ`.
//!
//! Timestamps live only inside the validation record, which is excluded from
//! the signed content, so the format matters for storage and display rather
//! than for hashing.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EfactError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Parse a strict UTC timestamp. Only the `Z` suffix is accepted.
    ///
    /// # Errors
    ///
    /// Returns `EfactError::InvalidTimestamp` if the string is not RFC 3339
    /// or carries an explicit offset (even `+00:00`).
    pub fn parse(s: &str) -> Result<Self, EfactError> {
        if !s.ends_with('Z') {
            return Err(EfactError::InvalidTimestamp(format!(
                "timestamp must use Z suffix (UTC only), got: {s:?}"
            )));
        }
        Self::parse_lenient(s)
    }

    /// Parse any RFC 3339 timestamp, converting offsets to UTC.
    pub fn parse_lenient(s: &str) -> Result<Self, EfactError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            EfactError::InvalidTimestamp(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as ISO8601 with Z suffix (e.g., `2026-01-15T12:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_iso8601())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_lenient(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}
