pub mod freshness;
pub mod ingest;
