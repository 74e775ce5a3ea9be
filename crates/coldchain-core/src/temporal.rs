//! # UTC Timestamps
//!
//! `Timestamp` records `issued_at`, `created_at` and `registered_at`
//! instants. UTC only, truncated to whole seconds, rendered
//! `YYYY-MM-DDTHH:MM:SSZ`. Non-UTC input is rejected by [`Timestamp::parse`].

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A UTC-only timestamp, truncated to seconds precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// From a `DateTime<Utc>`, truncating sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Parse an RFC 3339 string. Only the `Z` suffix is accepted.
    pub fn parse(s: &str) -> Result<Self, ParseError> {
        if !s.ends_with('Z') {
            return Err(ParseError::Timestamp {
                value: s.to_string(),
                reason: "must use Z suffix (UTC only)".to_string(),
            });
        }
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| ParseError::Timestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// From Unix epoch seconds.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, ParseError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| ParseError::Timestamp {
                value: secs.to_string(),
                reason: "out of range".to_string(),
            })
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Unix epoch seconds.
    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// This instant plus `secs` seconds, or `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        let secs = i64::try_from(secs).ok()?;
        let delta = Duration::try_seconds(secs)?;
        self.0.checked_add_signed(delta).map(Self)
    }

    /// `YYYY-MM-DDTHH:MM:SSZ`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_has_no_subseconds() {
        assert_eq!(Timestamp::now().as_datetime().nanosecond(), 0);
    }

    #[test]
    fn test_from_utc_truncates() {
        let dt = Utc
            .with_ymd_and_hms(2021, 3, 1, 8, 30, 45)
            .unwrap()
            .with_nanosecond(987_654_321)
            .unwrap();
        assert_eq!(Timestamp::from_utc(dt).to_iso8601(), "2021-03-01T08:30:45Z");
    }

    #[test]
    fn test_parse_z_accepted_offsets_rejected() {
        assert!(Timestamp::parse("2021-03-01T08:00:00Z").is_ok());
        assert!(Timestamp::parse("2021-03-01T08:00:00+00:00").is_err());
        assert!(Timestamp::parse("2021-03-01T13:00:00+05:00").is_err());
        assert!(Timestamp::parse("yesterday").is_err());
    }

    #[test]
    fn test_parse_truncates_fraction() {
        let ts = Timestamp::parse("2021-03-01T08:00:00.750Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2021-03-01T08:00:00Z");
    }

    #[test]
    fn test_checked_add_secs() {
        let ts = Timestamp::parse("2021-03-01T23:59:30Z").unwrap();
        let later = ts.checked_add_secs(45).unwrap();
        assert_eq!(later.to_iso8601(), "2021-03-02T00:00:15Z");
        assert!(ts.checked_add_secs(u64::MAX).is_none());
    }

    #[test]
    fn test_epoch_roundtrip_and_ordering() {
        let a = Timestamp::parse("2021-03-01T08:00:00Z").unwrap();
        let b = Timestamp::from_epoch_secs(a.epoch_secs() + 1).unwrap();
        assert!(a < b);
        assert_eq!(Timestamp::from_epoch_secs(a.epoch_secs()).unwrap(), a);
    }
}
