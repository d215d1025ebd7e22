use std::path::Path;

use duckdb::{params, Connection};
use serde::Deserialize;
use serde_json::Value;

use quantedge_core::UtcDateTime;

use crate::error::WarehouseError;

pub const FRESHNESS_TABLE: &str = "freshness_log";

/// One appended status row.
#[derive(Debug, Clone, PartialEq)]
pub struct FreshnessRecord {
    pub source_name: String,
    pub max_loaded_at: Option<UtcDateTime>,
    pub generated_at: UtcDateTime,
    pub status: String,
    pub max_loaded_at_time_ago_in_s: Option<i64>,
    pub criteria: Value,
}

/// Manifest document produced by the upstream freshness check
/// (`sources.json`): one generation instant plus per-source results.
#[derive(Debug, Clone, Deserialize)]
pub struct FreshnessManifest {
    pub generated_at: UtcDateTime,
    pub results: Vec<ManifestSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ManifestSource {
    pub unique_id: String,
    #[serde(default)]
    pub max_loaded_at: Option<UtcDateTime>,
    pub status: String,
    /// Emitted upstream as fractional seconds; stored truncated.
    #[serde(default)]
    pub max_loaded_at_time_ago_in_s: Option<f64>,
    #[serde(default)]
    pub criteria: Option<Value>,
}

impl FreshnessManifest {
    pub fn load(path: &Path) -> Result<Self, WarehouseError> {
        let raw = std::fs::read_to_string(path).map_err(|e| WarehouseError::Manifest {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&raw).map_err(|e| WarehouseError::Manifest {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Flatten the shared generation instant into per-source rows.
    pub fn records(&self) -> Vec<FreshnessRecord> {
        self.results
            .iter()
            .map(|source| FreshnessRecord {
                source_name: source.unique_id.clone(),
                max_loaded_at: source.max_loaded_at,
                generated_at: self.generated_at,
                status: source.status.clone(),
                max_loaded_at_time_ago_in_s: source
                    .max_loaded_at_time_ago_in_s
                    .map(|seconds| seconds as i64),
                criteria: source.criteria.clone().unwrap_or_else(|| Value::Object(Default::default())),
            })
            .collect()
    }
}

/// Append-only freshness table over DuckDB.
pub struct FreshnessLog {
    conn: Connection,
}

impl FreshnessLog {
    pub fn open(path: &Path) -> Result<Self, WarehouseError> {
        let conn = Connection::open(path).map_err(|e| WarehouseError::Open {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, WarehouseError> {
        let conn = Connection::open_in_memory().map_err(|e| WarehouseError::Open {
            path: String::from(":memory:"),
            detail: e.to_string(),
        })?;
        Ok(Self { conn })
    }

    /// Create the table when absent; a no-op when it already exists.
    ///
    /// `criteria` is TEXT holding the serialized JSON payload, the same
    /// shape the upstream manifest carries.
    pub fn ensure_table(&self) -> Result<(), WarehouseError> {
        self.conn
            .execute_batch(&format!(
                "
CREATE TABLE IF NOT EXISTS {FRESHNESS_TABLE} (
    source_name TEXT NOT NULL,
    max_loaded_at TIMESTAMPTZ,
    generated_at TIMESTAMPTZ NOT NULL,
    status TEXT NOT NULL,
    max_loaded_at_time_ago_in_s BIGINT,
    criteria TEXT NOT NULL
);
"
            ))
            .map_err(|e| WarehouseError::Schema(e.to_string()))
    }

    /// Append rows; any failure is fatal to the run.
    pub fn append(&self, records: &[FreshnessRecord]) -> Result<usize, WarehouseError> {
        let mut statement = self
            .conn
            .prepare(&format!(
                "
INSERT INTO {FRESHNESS_TABLE}
    (source_name, max_loaded_at, generated_at, status, max_loaded_at_time_ago_in_s, criteria)
VALUES (?, CAST(? AS TIMESTAMPTZ), CAST(? AS TIMESTAMPTZ), ?, ?, ?)
"
            ))
            .map_err(|e| WarehouseError::Insert(e.to_string()))?;

        for record in records {
            let criteria = serde_json::to_string(&record.criteria)
                .map_err(|e| WarehouseError::Insert(e.to_string()))?;
            statement
                .execute(params![
                    record.source_name,
                    record.max_loaded_at.map(UtcDateTime::format_rfc3339),
                    record.generated_at.format_rfc3339(),
                    record.status,
                    record.max_loaded_at_time_ago_in_s,
                    criteria,
                ])
                .map_err(|e| WarehouseError::Insert(e.to_string()))?;
        }

        Ok(records.len())
    }

    pub fn row_count(&self) -> Result<i64, WarehouseError> {
        self.conn
            .query_row(
                &format!("SELECT count(*) FROM {FRESHNESS_TABLE}"),
                [],
                |row| row.get(0),
            )
            .map_err(|e| WarehouseError::Insert(e.to_string()))
    }
}
