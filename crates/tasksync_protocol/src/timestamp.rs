//! Second-granularity timestamps and tolerant comparison.
//!
//! Every timestamp in the protocol is normalized to one comparable
//! representation: a naive UTC date-time truncated to whole seconds,
//! serialized textually as `YYYY-MM-DD HH:MM:SS`. Clients and the server
//! never have to agree on clocks exactly; comparisons go through an
//! equality window instead (see [`SyncTimestamp::drift_from`]).

use crate::error::ProtocolError;
use chrono::{NaiveDateTime, Timelike, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// Wire format for timestamps.
const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time as the sync protocol sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncTimestamp(NaiveDateTime);

/// How a timestamp relates to another under a tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDrift {
    /// The two timestamps are equal within the window.
    WithinTolerance,
    /// This timestamp is earlier than the other by more than the window.
    Earlier,
    /// This timestamp is later than the other by more than the window.
    Later,
}

impl SyncTimestamp {
    /// The current time, truncated to second granularity.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now().naive_utc())
    }

    /// Normalizes a date-time to the protocol's granularity.
    pub fn from_datetime(datetime: NaiveDateTime) -> Self {
        Self(datetime.with_nanosecond(0).unwrap_or(datetime))
    }

    /// Parses a textual timestamp in wire format.
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        NaiveDateTime::parse_from_str(text.trim(), WIRE_FORMAT)
            .map(Self)
            .map_err(|_| ProtocolError::InvalidTimestamp(text.to_string()))
    }

    /// The underlying date-time.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Compares against `other` with an equality window.
    ///
    /// The window absorbs clock skew between devices and the rounding
    /// introduced by second-granularity serialization.
    pub fn drift_from(&self, other: SyncTimestamp, tolerance: Duration) -> TimeDrift {
        let delta = self.0.signed_duration_since(other.0).num_seconds();
        let window = tolerance.as_secs() as i64;

        if delta.abs() <= window {
            TimeDrift::WithinTolerance
        } else if delta < 0 {
            TimeDrift::Earlier
        } else {
            TimeDrift::Later
        }
    }
}

impl fmt::Display for SyncTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(WIRE_FORMAT))
    }
}

impl Serialize for SyncTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SyncTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = SyncTimestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a `YYYY-MM-DD HH:MM:SS` timestamp")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                SyncTimestamp::parse(value).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: Duration = Duration::from_secs(1);

    #[test]
    fn parse_and_format_roundtrip() {
        let ts = SyncTimestamp::parse("2024-03-01 12:30:45").unwrap();
        assert_eq!(ts.to_string(), "2024-03-01 12:30:45");
    }

    #[test]
    fn parse_rejects_malformed_input() {
        assert!(SyncTimestamp::parse("not a date").is_err());
        assert!(SyncTimestamp::parse("2024-03-01").is_err());
        assert!(SyncTimestamp::parse("").is_err());
    }

    #[test]
    fn now_has_second_granularity() {
        let ts = SyncTimestamp::now();
        assert_eq!(ts.as_datetime().nanosecond(), 0);
    }

    #[test]
    fn drift_within_tolerance() {
        let a = SyncTimestamp::parse("2024-03-01 12:00:00").unwrap();
        let b = SyncTimestamp::parse("2024-03-01 12:00:01").unwrap();

        assert_eq!(a.drift_from(b, EPSILON), TimeDrift::WithinTolerance);
        assert_eq!(b.drift_from(a, EPSILON), TimeDrift::WithinTolerance);
        assert_eq!(a.drift_from(a, EPSILON), TimeDrift::WithinTolerance);
    }

    #[test]
    fn drift_outside_tolerance() {
        let older = SyncTimestamp::parse("2024-03-01 12:00:00").unwrap();
        let newer = SyncTimestamp::parse("2024-03-01 12:00:02").unwrap();

        assert_eq!(older.drift_from(newer, EPSILON), TimeDrift::Earlier);
        assert_eq!(newer.drift_from(older, EPSILON), TimeDrift::Later);
    }

    #[test]
    fn serde_uses_wire_format() {
        let ts = SyncTimestamp::parse("1975-01-01 00:00:00").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1975-01-01 00:00:00\"");

        let back: SyncTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn deserialize_rejects_malformed_input() {
        let result: Result<SyncTimestamp, _> = serde_json::from_str("\"tomorrow\"");
        assert!(result.is_err());
    }
}
