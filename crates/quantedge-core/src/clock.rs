//! Injectable sleep so backoff and pacing are testable without waiting.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

pub trait Sleeper: Send + Sync {
    fn sleep<'a>(&'a self, duration: Duration)
        -> Pin<Box<dyn Future<Output = ()> + Send + 'a>>;
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep<'a>(
        &'a self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        Box::pin(tokio::time::sleep(duration))
    }
}

/// Deterministic sleeper that records requested delays and returns
/// immediately. The fetch-engine counterpart of `NoopHttpClient`.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recorded(&self) -> Vec<Duration> {
        self.slept
            .lock()
            .expect("recording sleeper mutex poisoned")
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep<'a>(
        &'a self,
        duration: Duration,
    ) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        self.slept
            .lock()
            .expect("recording sleeper mutex poisoned")
            .push(duration);
        Box::pin(async {})
    }
}
