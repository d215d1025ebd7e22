use thiserror::Error;

/// Sink failures; upload errors carry the destination identity so the
/// operator can diagnose which object failed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("parquet encoding failed: {0}")]
    Encode(String),

    #[error("upload to gs://{bucket}/{path} failed: {detail}")]
    Upload {
        bucket: String,
        path: String,
        detail: String,
    },
}
