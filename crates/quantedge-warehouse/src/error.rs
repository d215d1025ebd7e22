use thiserror::Error;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error("failed to open warehouse at '{path}': {detail}")]
    Open { path: String, detail: String },

    #[error("failed to ensure table 'freshness_log': {0}")]
    Schema(String),

    #[error("failed to insert into 'freshness_log': {0}")]
    Insert(String),

    #[error("failed to read freshness manifest '{path}': {detail}")]
    Manifest { path: String, detail: String },
}
