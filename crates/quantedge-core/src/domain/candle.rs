use serde::{Deserialize, Serialize};

use crate::domain::interval::Interval;
use crate::domain::symbol::Symbol;
use crate::domain::timestamp::UtcDateTime;

/// Identifier attached to every row landed from the klines endpoint.
pub const SOURCE_BINANCE: &str = "binance";

/// One OHLCV bar as returned by the provider; `ts` is the open time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub ts: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Identity of one logical series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesKey {
    pub symbol: Symbol,
    pub interval: Interval,
    pub source: &'static str,
}

impl SeriesKey {
    pub fn binance(symbol: Symbol, interval: Interval) -> Self {
        Self {
            symbol,
            interval,
            source: SOURCE_BINANCE,
        }
    }
}

/// Candle with its series identity flattened in; the unit persisted to
/// the columnar sink. Field order matches the sink schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub timestamp: UtcDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub symbol: String,
    pub interval: String,
    pub source: String,
}

impl NormalizedRow {
    pub fn from_candle(candle: Candle, key: &SeriesKey) -> Self {
        Self {
            timestamp: candle.ts,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
            symbol: key.symbol.as_str().to_owned(),
            interval: key.interval.as_str().to_owned(),
            source: key.source.to_owned(),
        }
    }
}
