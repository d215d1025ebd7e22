//! Core fetch engine for quantedge: domain types, window splitting,
//! retrying provider access, paging and normalization.

pub mod clock;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod normalize;
pub mod pager;
pub mod paths;
pub mod provider;
pub mod range;
pub mod retry;
pub mod transport;

pub use clock::{RecordingSleeper, Sleeper, TokioSleeper};
pub use domain::candle::{Candle, NormalizedRow, SeriesKey, SOURCE_BINANCE};
pub use domain::interval::Interval;
pub use domain::symbol::Symbol;
pub use domain::timestamp::UtcDateTime;
pub use error::{ConfigError, FetchError};
pub use fetch::ResilientFetcher;
pub use normalize::normalize;
pub use pager::Pager;
pub use paths::build_object_path;
pub use provider::{BinanceKlines, CandleProvider};
pub use range::{split, TimeRange, Windows};
pub use retry::RetryPolicy;
pub use transport::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, ReqwestHttpClient,
};
