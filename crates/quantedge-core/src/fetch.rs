//! Resilient fetcher: one bounded provider call with retry, backoff
//! and rate-limit cooldown.

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::clock::Sleeper;
use crate::domain::candle::{Candle, SeriesKey};
use crate::error::FetchError;
use crate::provider::CandleProvider;
use crate::range::TimeRange;
use crate::retry::RetryPolicy;

/// Cooldown observed after an HTTP 429 before the normal backoff sleep.
pub const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(2);

pub struct ResilientFetcher {
    provider: Arc<dyn CandleProvider>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ResilientFetcher {
    pub fn new(
        provider: Arc<dyn CandleProvider>,
        policy: RetryPolicy,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            provider,
            policy,
            sleeper,
        }
    }

    /// Fetch one sub-window, retrying transient failures.
    ///
    /// Terminal errors propagate immediately. Once the attempt budget
    /// is spent the last transient error is surfaced inside
    /// [`FetchError::AttemptsExhausted`].
    pub async fn fetch(
        &self,
        key: &SeriesKey,
        window: TimeRange,
        limit: u32,
    ) -> Result<Vec<Candle>, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            match self.provider.fetch(key, window, limit).await {
                Ok(candles) => return Ok(candles),
                Err(error) if error.is_retryable() => {
                    if matches!(error, FetchError::RateLimited) {
                        self.sleeper.sleep(RATE_LIMIT_COOLDOWN).await;
                    }

                    attempt += 1;
                    if attempt >= self.policy.max_attempts {
                        return Err(FetchError::AttemptsExhausted {
                            attempts: attempt,
                            last: Box::new(error),
                        });
                    }

                    let delay = self.policy.delay_for_attempt(attempt - 1);
                    warn!(
                        symbol = key.symbol.as_str(),
                        interval = key.interval.as_str(),
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "retrying provider call: {error}"
                    );
                    self.sleeper.sleep(delay).await;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::RecordingSleeper;
    use crate::domain::interval::Interval;
    use crate::domain::symbol::Symbol;
    use crate::domain::timestamp::UtcDateTime;

    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;

    struct ScriptedProvider {
        outcomes: Mutex<Vec<Result<Vec<Candle>, FetchError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedProvider {
        fn new(outcomes: Vec<Result<Vec<Candle>, FetchError>>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl CandleProvider for ScriptedProvider {
        fn fetch<'a>(
            &'a self,
            _key: &'a SeriesKey,
            _window: TimeRange,
            _limit: u32,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Candle>, FetchError>> + Send + 'a>> {
            *self.calls.lock().unwrap() += 1;
            let outcome = self.outcomes.lock().unwrap().remove(0);
            Box::pin(async move { outcome })
        }
    }

    fn key() -> SeriesKey {
        SeriesKey::binance(Symbol::parse("ETHUSDT").unwrap(), Interval::OneHour)
    }

    fn window() -> TimeRange {
        TimeRange::new(
            UtcDateTime::parse("2024-01-01T00:00:00Z").unwrap(),
            UtcDateTime::parse("2024-01-02T00:00:00Z").unwrap(),
        )
        .unwrap()
    }

    fn candle(ms: i64) -> Candle {
        Candle {
            ts: UtcDateTime::from_unix_ms(ms).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        }
    }

    #[tokio::test]
    async fn succeeds_after_two_rate_limits() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(FetchError::RateLimited),
            Err(FetchError::RateLimited),
            Ok(vec![candle(1_704_067_200_000)]),
        ]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let fetcher = ResilientFetcher::new(
            provider.clone(),
            RetryPolicy::default(),
            sleeper.clone(),
        );

        let candles = fetcher.fetch(&key(), window(), 1000).await.expect("must succeed");
        assert_eq!(candles.len(), 1);
        assert_eq!(provider.calls(), 3);

        // Two cooldowns and two backoff delays.
        let slept = sleeper.recorded();
        assert_eq!(
            slept,
            vec![
                RATE_LIMIT_COOLDOWN,
                Duration::from_secs(1),
                RATE_LIMIT_COOLDOWN,
                Duration::from_secs(2),
            ]
        );
    }

    #[tokio::test]
    async fn terminal_error_is_not_retried() {
        let provider = Arc::new(ScriptedProvider::new(vec![Err(FetchError::Rejected {
            status: 400,
            detail: String::from("Invalid symbol."),
        })]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let fetcher =
            ResilientFetcher::new(provider.clone(), RetryPolicy::default(), sleeper.clone());

        let err = fetcher.fetch(&key(), window(), 1000).await.expect_err("must fail");
        assert!(matches!(err, FetchError::Rejected { status: 400, .. }));
        assert_eq!(provider.calls(), 1);
        assert!(sleeper.recorded().is_empty());
    }

    #[tokio::test]
    async fn exhausts_attempt_budget() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(FetchError::UpstreamStatus { status: 503 }),
            Err(FetchError::UpstreamStatus { status: 503 }),
            Err(FetchError::UpstreamStatus { status: 503 }),
        ]));
        let sleeper = Arc::new(RecordingSleeper::new());
        let policy = RetryPolicy {
            max_attempts: 3,
            ..RetryPolicy::default()
        };
        let fetcher = ResilientFetcher::new(provider.clone(), policy, sleeper.clone());

        let err = fetcher.fetch(&key(), window(), 1000).await.expect_err("must fail");
        match err {
            FetchError::AttemptsExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, FetchError::UpstreamStatus { status: 503 }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(provider.calls(), 3);
        // max_attempts - 1 backoff sleeps, no cooldowns.
        assert_eq!(sleeper.recorded().len(), 2);
    }
}
