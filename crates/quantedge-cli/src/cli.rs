//! CLI argument definitions for quantedge.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Binance OHLCV ingestion into object storage, plus warehouse
/// freshness loading.
#[derive(Debug, Parser)]
#[command(
    name = "quantedge",
    author,
    version,
    about = "Ingest OHLCV candles from Binance into object storage as Parquet"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch candles for a set of symbols and upload one Parquet object
    /// per symbol, partitioned by symbol/interval/run date.
    Ingest(IngestArgs),
    /// Read a freshness manifest and append status rows to the
    /// warehouse log table, creating it if absent.
    Freshness(FreshnessArgs),
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// YAML config file supplying defaults; flags override it.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Destination bucket (name only).
    #[arg(long)]
    pub bucket: Option<String>,

    /// Project billed for storage requests (x-goog-user-project).
    #[arg(long)]
    pub project_id: Option<String>,

    /// Symbols to ingest, e.g. BTCUSDT ETHUSDT.
    #[arg(long, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Candle interval: 1m, 5m, 15m, 30m, 1h, 4h, 1d.
    #[arg(long)]
    pub interval: Option<String>,

    /// Lookback in days when --start is absent.
    #[arg(long)]
    pub days: Option<i64>,

    /// UTC start, RFC3339 (e.g. 2024-01-01T00:00:00Z).
    #[arg(long)]
    pub start: Option<String>,

    /// UTC end, RFC3339 (defaults to now).
    #[arg(long)]
    pub end: Option<String>,

    /// Object path prefix, e.g. ohlcv.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Environment variable holding the storage bearer token.
    #[arg(long, default_value = "QUANTEDGE_GCS_TOKEN")]
    pub auth_token_env: String,

    /// Provider base URL override (primarily for testing).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Abort the whole run on the first failed symbol instead of
    /// continuing and exiting non-zero at the end.
    #[arg(long, default_value_t = false)]
    pub fail_fast: bool,
}

#[derive(Debug, Args)]
pub struct FreshnessArgs {
    /// Freshness manifest produced by the upstream check.
    #[arg(long, default_value = "target/sources.json")]
    pub manifest: PathBuf,

    /// DuckDB database file holding the freshness_log table.
    #[arg(long, default_value = "quantedge.duckdb")]
    pub database: PathBuf,
}
