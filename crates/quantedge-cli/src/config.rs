//! Startup configuration: YAML file defaults merged under CLI flags,
//! assembled once and passed down. Inner components never read
//! configuration ad hoc.

use std::path::Path;

use serde::Deserialize;

use quantedge_core::{ConfigError, Interval, Symbol, TimeRange, UtcDateTime};

use crate::cli::IngestArgs;
use crate::error::CliError;

const DEFAULT_SYMBOLS: &[&str] = &["BTCUSDT"];
const DEFAULT_INTERVAL: Interval = Interval::OneHour;
const DEFAULT_LOOKBACK_DAYS: i64 = 30;
const DEFAULT_PREFIX: &str = "ohlcv";

/// Raw YAML document; every key optional so a partial file works.
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    bucket: Option<String>,
    project_id: Option<String>,
    symbols: Option<Vec<String>>,
    interval: Option<String>,
    days: Option<i64>,
    #[serde(default)]
    partitioning: Partitioning,
}

#[derive(Debug, Default, Deserialize)]
struct Partitioning {
    prefix: Option<String>,
}

impl FileConfig {
    /// A missing file yields empty defaults; a malformed one is a
    /// configuration error.
    fn load(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| CliError::ConfigFile {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        serde_yaml::from_str(&raw).map_err(|e| CliError::ConfigFile {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }
}

/// Fully resolved ingest run configuration.
#[derive(Debug)]
pub struct IngestConfig {
    pub bucket: String,
    pub project_id: Option<String>,
    pub symbols: Vec<Symbol>,
    pub interval: Interval,
    pub range: TimeRange,
    pub prefix: String,
    pub auth_token_env: String,
    pub base_url: Option<String>,
    pub fail_fast: bool,
}

impl IngestConfig {
    pub fn resolve(args: &IngestArgs) -> Result<Self, CliError> {
        Self::resolve_at(args, UtcDateTime::now())
    }

    /// Resolution with an explicit "now" so window defaulting is
    /// deterministic in tests.
    pub fn resolve_at(args: &IngestArgs, now: UtcDateTime) -> Result<Self, CliError> {
        let file = FileConfig::load(&args.config)?;

        let bucket = args
            .bucket
            .clone()
            .or(file.bucket)
            .ok_or(ConfigError::MissingBucket)?;
        let project_id = args.project_id.clone().or(file.project_id);

        let raw_symbols: Vec<String> = if args.symbols.is_empty() {
            file.symbols.unwrap_or_else(|| {
                DEFAULT_SYMBOLS.iter().map(|s| (*s).to_owned()).collect()
            })
        } else {
            args.symbols.clone()
        };
        let symbols = raw_symbols
            .iter()
            .map(|raw| Symbol::parse(raw))
            .collect::<Result<Vec<Symbol>, ConfigError>>()?;

        let interval = match args.interval.as_deref().or(file.interval.as_deref()) {
            Some(raw) => raw.parse::<Interval>()?,
            None => DEFAULT_INTERVAL,
        };

        let days = args.days.or(file.days).unwrap_or(DEFAULT_LOOKBACK_DAYS);
        let end = match &args.end {
            Some(raw) => UtcDateTime::parse(raw)?,
            None => now,
        };
        let start = match &args.start {
            Some(raw) => UtcDateTime::parse(raw)?,
            None => now.saturating_sub(time::Duration::days(days)),
        };
        let range = TimeRange::new(start, end)?;
        if range.is_empty() {
            return Err(ConfigError::EmptyWindow.into());
        }

        let prefix = args
            .prefix
            .clone()
            .or(file.partitioning.prefix)
            .unwrap_or_else(|| String::from(DEFAULT_PREFIX));

        Ok(Self {
            bucket,
            project_id,
            symbols,
            interval,
            range,
            prefix,
            auth_token_env: args.auth_token_env.clone(),
            base_url: args.base_url.clone(),
            fail_fast: args.fail_fast,
        })
    }
}
