use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::error::ConfigError;

/// RFC3339 instant normalized to UTC.
///
/// Inputs carrying a non-UTC offset are converted, not rejected; the
/// provider wire format is millisecond epochs, so lossless conversions
/// in both directions are provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcDateTime(OffsetDateTime);

impl UtcDateTime {
    pub fn now() -> Self {
        Self(OffsetDateTime::now_utc())
    }

    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let parsed =
            OffsetDateTime::parse(input, &Rfc3339).map_err(|_| ConfigError::InvalidTimestamp {
                value: input.to_owned(),
            })?;
        Ok(Self(parsed.to_offset(UtcOffset::UTC)))
    }

    pub fn from_unix_ms(ms: i64) -> Result<Self, ConfigError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
            .map(Self)
            .map_err(|_| ConfigError::InvalidTimestamp {
                value: ms.to_string(),
            })
    }

    pub fn unix_ms(self) -> i64 {
        (self.0.unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// UTC calendar date of this instant.
    pub fn date(self) -> Date {
        self.0.date()
    }

    pub fn into_inner(self) -> OffsetDateTime {
        self.0
    }

    pub fn from_offset_datetime(value: OffsetDateTime) -> Self {
        Self(value.to_offset(UtcOffset::UTC))
    }

    pub fn format_rfc3339(self) -> String {
        self.0
            .format(&Rfc3339)
            .expect("UtcDateTime must be RFC3339 formattable")
    }

    pub fn saturating_add(self, duration: time::Duration) -> Self {
        Self(self.0.saturating_add(duration))
    }

    pub fn saturating_sub(self, duration: time::Duration) -> Self {
        Self(self.0.saturating_sub(duration))
    }
}

impl Display for UtcDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_rfc3339())
    }
}

impl Serialize for UtcDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format_rfc3339())
    }
}

impl<'de> Deserialize<'de> for UtcDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_timestamp() {
        let parsed = UtcDateTime::parse("2024-01-01T00:00:00Z").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn normalizes_offset_timestamp_to_utc() {
        let parsed = UtcDateTime::parse("2024-01-01T01:00:00+01:00").expect("must parse");
        assert_eq!(parsed.format_rfc3339(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn rejects_garbage() {
        let err = UtcDateTime::parse("yesterday").expect_err("must fail");
        assert!(matches!(err, ConfigError::InvalidTimestamp { .. }));
    }

    #[test]
    fn round_trips_unix_ms() {
        let ts = UtcDateTime::parse("2024-06-15T12:30:00Z").expect("must parse");
        let ms = ts.unix_ms();
        assert_eq!(UtcDateTime::from_unix_ms(ms).expect("must convert"), ts);
    }
}
