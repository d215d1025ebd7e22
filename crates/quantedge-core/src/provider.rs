//! Binance klines adapter behind the [`CandleProvider`] seam.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::domain::candle::{Candle, SeriesKey};
use crate::domain::timestamp::UtcDateTime;
use crate::error::FetchError;
use crate::range::TimeRange;
use crate::transport::{HttpClient, HttpRequest};

pub const BINANCE_BASE_URL: &str = "https://api.binance.com";

/// Raw provider access: one bounded call for one sub-window. Retry and
/// pacing live above this seam.
pub trait CandleProvider: Send + Sync {
    fn fetch<'a>(
        &'a self,
        key: &'a SeriesKey,
        window: TimeRange,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, FetchError>> + Send + 'a>>;
}

/// `GET /api/v3/klines` adapter.
///
/// Response rows are fixed-shape arrays
/// `[openTime, open, high, low, close, volume, closeTime, ...]`; only
/// the first six fields are consumed. Prices and volume arrive as
/// strings.
pub struct BinanceKlines {
    http: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl BinanceKlines {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            base_url: String::from(BINANCE_BASE_URL),
            timeout_ms: 30_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn klines_url(&self, key: &SeriesKey, window: TimeRange, limit: u32) -> String {
        format!(
            "{}/api/v3/klines?symbol={}&interval={}&startTime={}&endTime={}&limit={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(key.symbol.as_str()),
            key.interval.as_str(),
            window.start().unix_ms(),
            window.end().unix_ms(),
            limit
        )
    }
}

impl CandleProvider for BinanceKlines {
    fn fetch<'a>(
        &'a self,
        key: &'a SeriesKey,
        window: TimeRange,
        limit: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, FetchError>> + Send + 'a>> {
        Box::pin(async move {
            let request =
                HttpRequest::get(self.klines_url(key, window, limit)).with_timeout_ms(self.timeout_ms);

            let response = self
                .http
                .execute(request)
                .await
                .map_err(|e| FetchError::Transport(e.message().to_owned()))?;

            match response.status {
                _ if response.is_success() => parse_klines(&response.body),
                429 => Err(FetchError::RateLimited),
                status if status >= 500 => Err(FetchError::UpstreamStatus { status }),
                status => Err(FetchError::Rejected {
                    status,
                    detail: truncate(&response.body, 200),
                }),
            }
        })
    }
}

fn parse_klines(body: &str) -> Result<Vec<Candle>, FetchError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedPayload(format!("not a kline array: {e}")))?;

    rows.iter().map(|row| parse_kline_row(row)).collect()
}

fn parse_kline_row(row: &[Value]) -> Result<Candle, FetchError> {
    if row.len() < 6 {
        return Err(FetchError::MalformedPayload(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }

    let open_time = row[0].as_i64().ok_or_else(|| {
        FetchError::MalformedPayload(String::from("kline openTime is not an integer"))
    })?;
    let ts = UtcDateTime::from_unix_ms(open_time).map_err(|_| {
        FetchError::MalformedPayload(format!("kline openTime {open_time} out of range"))
    })?;

    Ok(Candle {
        ts,
        open: parse_price(&row[1], "open")?,
        high: parse_price(&row[2], "high")?,
        low: parse_price(&row[3], "low")?,
        close: parse_price(&row[4], "close")?,
        volume: parse_price(&row[5], "volume")?,
    })
}

fn parse_price(value: &Value, field: &str) -> Result<f64, FetchError> {
    let parsed = match value {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        FetchError::MalformedPayload(format!("kline field '{field}' is not numeric: {value}"))
    })
}

fn truncate(body: &str, max: usize) -> String {
    if body.chars().count() <= max {
        body.to_owned()
    } else {
        let mut cut: String = body.chars().take(max).collect();
        cut.push('…');
        cut
    }
}
