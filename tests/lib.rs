//! Shared scripted doubles for cross-crate behavior tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use quantedge_core::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Transport double that replays queued outcomes in order and records
/// every request it sees.
pub struct ScriptedHttpClient {
    outcomes: Mutex<Vec<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn new(outcomes: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_responses(responses: Vec<HttpResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("scripted client mutex").clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("scripted client mutex").len()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("scripted client mutex")
            .push(request);
        let mut outcomes = self.outcomes.lock().expect("scripted client mutex");
        assert!(
            !outcomes.is_empty(),
            "scripted client ran out of queued outcomes"
        );
        let outcome = outcomes.remove(0);
        Box::pin(async move { outcome })
    }
}

/// One provider kline row: `[openTime, open, high, low, close, volume,
/// closeTime]`, prices as strings the way the wire format carries them.
pub fn kline_row(open_time_ms: i64, close: f64) -> serde_json::Value {
    serde_json::json!([
        open_time_ms,
        "1.0",
        "2.0",
        "0.5",
        close.to_string(),
        "10.0",
        open_time_ms + 59_999
    ])
}

pub fn kline_body(rows: &[serde_json::Value]) -> String {
    serde_json::Value::Array(rows.to_vec()).to_string()
}
