//! Columnar serialization of normalized rows.

use std::sync::Arc;

use ::parquet::arrow::ArrowWriter;
use ::parquet::basic::Compression;
use ::parquet::file::properties::WriterProperties;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;

use quantedge_core::NormalizedRow;

use crate::error::StoreError;

/// Nine-column sink schema; identical for zero rows so callers can
/// detect "no data" without a type distinction from "one row".
fn sink_schema() -> Schema {
    Schema::new(vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Millisecond, Some("UTC".into())),
            false,
        ),
        Field::new("open", DataType::Float64, false),
        Field::new("high", DataType::Float64, false),
        Field::new("low", DataType::Float64, false),
        Field::new("close", DataType::Float64, false),
        Field::new("volume", DataType::Float64, false),
        Field::new("symbol", DataType::Utf8, false),
        Field::new("interval", DataType::Utf8, false),
        Field::new("source", DataType::Utf8, false),
    ])
}

/// Encode rows into a self-contained Parquet payload.
///
/// Output bytes are deterministic for identical input, which makes
/// same-day re-runs byte-for-byte idempotent at the sink.
pub fn to_parquet_bytes(rows: &[NormalizedRow]) -> Result<Vec<u8>, StoreError> {
    let schema = Arc::new(sink_schema());

    let timestamps: Vec<i64> = rows.iter().map(|r| r.timestamp.unix_ms()).collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(TimestampMillisecondArray::from(timestamps).with_timezone("UTC")),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.open))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.high))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.low))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.close))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.volume))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.symbol.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.interval.as_str()))),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.source.as_str()))),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns)
        .map_err(|e| StoreError::Encode(e.to_string()))?;

    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema, Some(properties))
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    writer
        .write(&batch)
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    writer
        .close()
        .map_err(|e| StoreError::Encode(e.to_string()))?;

    Ok(buffer)
}
