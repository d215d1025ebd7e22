//! Freshness log: appends source staleness rows to an analytical
//! warehouse table, creating the table if absent.

pub mod error;
pub mod freshness;

pub use error::WarehouseError;
pub use freshness::{FreshnessLog, FreshnessManifest, FreshnessRecord, FRESHNESS_TABLE};
