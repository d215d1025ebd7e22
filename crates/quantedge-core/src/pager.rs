//! Drives the window splitter against the resilient fetcher, one
//! sequential call per sub-window.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::Sleeper;
use crate::domain::candle::{Candle, SeriesKey};
use crate::error::FetchError;
use crate::fetch::ResilientFetcher;
use crate::range::{split, TimeRange};

/// Soft-rate-limit pacing between successive provider calls.
pub const DEFAULT_PACING: Duration = Duration::from_millis(150);
/// Provider record cap per call.
pub const DEFAULT_PAGE_SIZE: u32 = 1000;

pub struct Pager {
    fetcher: ResilientFetcher,
    sleeper: Arc<dyn Sleeper>,
    pacing: Duration,
    page_size: u32,
}

impl Pager {
    pub fn new(fetcher: ResilientFetcher, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            fetcher,
            sleeper,
            pacing: DEFAULT_PACING,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Collect raw candles for the whole range.
    ///
    /// An empty range returns an empty buffer without touching the
    /// network. Fetcher errors propagate unchanged; there is no
    /// partial-window retry at this layer.
    pub async fn page(
        &self,
        key: &SeriesKey,
        range: TimeRange,
    ) -> Result<Vec<Candle>, FetchError> {
        let mut buffer = Vec::new();
        if range.is_empty() {
            return Ok(buffer);
        }

        let mut first = true;
        for window in split(range, key.interval) {
            if !first {
                self.sleeper.sleep(self.pacing).await;
            }
            first = false;

            let mut candles = self.fetcher.fetch(key, window, self.page_size).await?;
            buffer.append(&mut candles);
        }

        Ok(buffer)
    }
}
