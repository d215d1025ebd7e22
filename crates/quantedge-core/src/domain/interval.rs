use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Duration;

use crate::error::ConfigError;

/// Supported candle granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Self; 7] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }

    /// Longest request span safe at this granularity.
    ///
    /// Conservative against the provider's 1000-record cap per call:
    /// e.g. 12 hours of 1m candles is 720 records.
    pub const fn max_request_span(self) -> Duration {
        match self {
            Self::OneMinute => Duration::hours(12),
            Self::FiveMinutes => Duration::days(2),
            Self::FifteenMinutes => Duration::days(6),
            Self::ThirtyMinutes => Duration::days(12),
            Self::OneHour => Duration::days(24),
            Self::FourHours => Duration::days(96),
            Self::OneDay => Duration::days(365 * 2),
        }
    }

    /// Length of one candle at this granularity.
    pub const fn bar_length(self) -> Duration {
        match self {
            Self::OneMinute => Duration::minutes(1),
            Self::FiveMinutes => Duration::minutes(5),
            Self::FifteenMinutes => Duration::minutes(15),
            Self::ThirtyMinutes => Duration::minutes(30),
            Self::OneHour => Duration::hours(1),
            Self::FourHours => Duration::hours(4),
            Self::OneDay => Duration::days(1),
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(Self::OneMinute),
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "30m" => Ok(Self::ThirtyMinutes),
            "1h" => Ok(Self::OneHour),
            "4h" => Ok(Self::FourHours),
            "1d" => Ok(Self::OneDay),
            other => Err(ConfigError::UnsupportedInterval {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_interval() {
        assert_eq!(Interval::from_str("4h").expect("must parse"), Interval::FourHours);
        assert_eq!(Interval::from_str(" 1D ").expect("must parse"), Interval::OneDay);
    }

    #[test]
    fn rejects_unknown_interval() {
        let err = Interval::from_str("2h").expect_err("must fail");
        assert!(matches!(err, ConfigError::UnsupportedInterval { .. }));
    }

    #[test]
    fn span_never_exceeds_record_cap() {
        for interval in Interval::ALL {
            let per_call = interval.max_request_span().whole_seconds()
                / interval.bar_length().whole_seconds();
            assert!(
                per_call <= 1_000,
                "{interval} would request {per_call} candles in one call"
            );
        }
    }
}
