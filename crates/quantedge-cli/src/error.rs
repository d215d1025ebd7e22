use thiserror::Error;

use quantedge_core::{ConfigError, FetchError};
use quantedge_store::StoreError;
use quantedge_warehouse::WarehouseError;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read config file '{path}': {detail}")]
    ConfigFile { path: String, detail: String },

    #[error("ingestion failed for symbol {symbol}: {source}")]
    Symbol {
        symbol: String,
        #[source]
        source: SymbolError,
    },

    #[error("{failed} of {total} symbols failed; see log for details")]
    PartialFailure { failed: usize, total: usize },

    #[error(transparent)]
    Warehouse(#[from] WarehouseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::ConfigFile { .. } => 2,
            Self::Symbol { .. }
            | Self::PartialFailure { .. }
            | Self::Warehouse(_)
            | Self::Io(_) => 1,
        }
    }
}

/// Failure of one symbol's fetch-normalize-upload sequence. Other
/// symbols keep running unless `--fail-fast` is set.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_exit_with_two() {
        let err = CliError::Config(ConfigError::MissingBucket);
        assert_eq!(err.exit_code(), 2);
        let err = CliError::ConfigFile {
            path: String::from("config.yaml"),
            detail: String::from("bad yaml"),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn runtime_errors_exit_with_one() {
        let err = CliError::PartialFailure {
            failed: 1,
            total: 3,
        };
        assert_eq!(err.exit_code(), 1);
    }
}
