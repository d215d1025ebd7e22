//! Sink side of the pipeline: Parquet encoding and object storage.

pub mod error;
pub mod object;
pub mod parquet;

pub use error::StoreError;
pub use object::{GcsStore, MemoryStore, ObjectStore, PARQUET_CONTENT_TYPE};
pub use parquet::to_parquet_bytes;
