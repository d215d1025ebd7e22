use thiserror::Error;

/// Configuration and validation errors raised before any network call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unsupported interval '{value}', expected one of 1m, 5m, 15m, 30m, 1h, 4h, 1d")]
    UnsupportedInterval { value: String },

    #[error("time range start {start} must not be after end {end}")]
    InvertedRange { start: String, end: String },

    #[error("resolved time window is empty, start must be before end")]
    EmptyWindow,

    #[error("destination bucket is required (pass --bucket or set `bucket` in the config file)")]
    MissingBucket,

    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339: '{value}'")]
    InvalidTimestamp { value: String },
}

/// Provider fetch errors. Retryable variants are recovered by
/// [`crate::ResilientFetcher`] up to its attempt budget; terminal
/// variants propagate immediately.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP 429 from the provider.
    #[error("provider rate limited the request (HTTP 429)")]
    RateLimited,

    /// 5xx or another status the provider documents as transient.
    #[error("provider returned retryable status {status}")]
    UpstreamStatus { status: u16 },

    /// Connection/timeout level failure before a status was received.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Non-retryable client error, e.g. an unknown symbol.
    #[error("provider rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    #[error("malformed provider payload: {0}")]
    MalformedPayload(String),

    /// Terminal wrapper emitted once the retry budget is spent.
    #[error("retry budget exhausted after {attempts} attempts")]
    AttemptsExhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

impl FetchError {
    /// Whether the fetcher may retry after this error.
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited | Self::UpstreamStatus { .. } | Self::Transport(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_upstream_are_retryable() {
        assert!(FetchError::RateLimited.is_retryable());
        assert!(FetchError::UpstreamStatus { status: 503 }.is_retryable());
        assert!(FetchError::Transport(String::from("timed out")).is_retryable());
    }

    #[test]
    fn client_rejection_is_terminal() {
        let err = FetchError::Rejected {
            status: 400,
            detail: String::from("Invalid symbol."),
        };
        assert!(!err.is_retryable());
        assert!(!FetchError::MalformedPayload(String::new()).is_retryable());
    }
}
