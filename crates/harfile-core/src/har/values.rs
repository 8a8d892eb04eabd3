use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Serialize, Serializer};

/// Largest integer an f64 holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A HAR date-time stamp.
///
/// The wire string is always retained so that re-encoding reproduces it byte for byte.
/// When the string is not ISO 8601 with a timezone offset, `datetime()` is `None` and the
/// record is flagged invalid instead of failing the whole decode.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timestamp {
    raw: String,
    parsed: Option<DateTime<FixedOffset>>,
}

impl Timestamp {
    /// Parse a wire string, keeping it even when it is not a valid timestamp
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let parsed = parse_iso8601(&raw);
        Self { raw, parsed }
    }

    /// Build a timestamp from a date-time, rendered with millisecond precision
    pub fn from_datetime(datetime: impl Into<DateTime<FixedOffset>>) -> Self {
        let datetime = datetime.into();
        Self {
            raw: datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
            parsed: Some(datetime),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn datetime(&self) -> Option<DateTime<FixedOffset>> {
        self.parsed
    }

    pub fn is_valid(&self) -> bool {
        self.parsed.is_some()
    }
}

fn parse_iso8601(raw: &str) -> Option<DateTime<FixedOffset>> {
    // RFC 3339 covers the common `...Z` / `...+01:00` forms; the second format
    // accepts offsets written without a colon (`+0100`).
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// An optional timing phase in milliseconds.
///
/// HAR distinguishes three states that a plain `Option<f64>` would blur:
/// the field is left out (not measured), set to `-1` (does not apply to this
/// request), or carries a duration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Timing {
    /// Field absent from the document
    #[default]
    Unmeasured,
    /// Field set to `-1`
    NotApplicable,
    Millis(f64),
}

impl Timing {
    pub fn millis(self) -> Option<f64> {
        match self {
            Timing::Millis(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unmeasured(&self) -> bool {
        matches!(self, Timing::Unmeasured)
    }
}

impl Serialize for Timing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Timing::Unmeasured => serializer.serialize_none(),
            Timing::NotApplicable => serializer.serialize_i64(-1),
            Timing::Millis(value) => serialize_millis(value, serializer),
        }
    }
}

/// A byte count where `-1` means the size is not known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Size {
    #[default]
    Unknown,
    Bytes(u64),
}

impl Size {
    pub fn bytes(self) -> Option<u64> {
        match self {
            Size::Bytes(count) => Some(count),
            Size::Unknown => None,
        }
    }
}

impl Serialize for Size {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Size::Unknown => serializer.serialize_i64(-1),
            Size::Bytes(count) => serializer.serialize_u64(*count),
        }
    }
}

/// Write a millisecond value without adding digits the source did not have.
///
/// Integral values are written as integers (`10`, not `10.0`); everything else
/// uses the shortest representation that parses back to the same f64.
pub(crate) fn serialize_millis<S: Serializer>(
    value: &f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_timestamp_accepts_har_examples() {
        for raw in [
            "2009-07-24T19:20:30.45+01:00",
            "2009-07-24T19:20:30.123+02:00",
            "2020-01-01T00:00:00.000Z",
            "2020-01-01T00:00:00Z",
            "2020-01-01T00:00:00.000+0100",
        ] {
            assert!(Timestamp::parse(raw).is_valid(), "{} should parse", raw);
        }
    }

    #[test]
    fn test_timestamp_without_offset_is_invalid_but_kept() {
        let ts = Timestamp::parse("2020-01-01T00:00:00");
        assert!(!ts.is_valid());
        assert_eq!(ts.as_str(), "2020-01-01T00:00:00");

        let garbage = Timestamp::parse("yesterday");
        assert!(garbage.datetime().is_none());
        assert_eq!(garbage.as_str(), "yesterday");
    }

    #[test]
    fn test_timestamp_from_datetime_parses_back() {
        let dt = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let ts = Timestamp::from_datetime(dt);
        assert!(ts.is_valid());
        assert_eq!(Timestamp::parse(ts.as_str()), ts);
    }

    #[test]
    fn test_timing_serialization() {
        assert_eq!(serde_json::to_string(&Timing::NotApplicable).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Timing::Millis(12.0)).unwrap(), "12");
        assert_eq!(serde_json::to_string(&Timing::Millis(0.1)).unwrap(), "0.1");
        assert_eq!(
            serde_json::to_string(&Timing::Millis(1.2345678901234)).unwrap(),
            "1.2345678901234"
        );
    }

    #[test]
    fn test_size_serialization() {
        assert_eq!(serde_json::to_string(&Size::Unknown).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Size::Bytes(0)).unwrap(), "0");
        assert_eq!(Size::Bytes(42).bytes(), Some(42));
        assert_eq!(Size::Unknown.bytes(), None);
    }
}
