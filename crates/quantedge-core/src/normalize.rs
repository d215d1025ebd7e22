//! Dedup, sort and clip raw candles into the persisted row shape.

use std::collections::BTreeMap;

use crate::domain::candle::{Candle, NormalizedRow, SeriesKey};
use crate::domain::timestamp::UtcDateTime;
use crate::range::TimeRange;

/// Produce the final ordered table for one series.
///
/// Overlapping page boundaries return identical data for the same
/// timestamp, so last-write-wins dedup is safe. Clipping is inclusive
/// on both ends of `range`. Empty input yields an empty vec; the sink
/// keeps the schema stable for zero rows.
pub fn normalize(raw: Vec<Candle>, key: &SeriesKey, range: TimeRange) -> Vec<NormalizedRow> {
    let mut by_ts: BTreeMap<UtcDateTime, Candle> = BTreeMap::new();
    for candle in raw {
        if range.contains_inclusive(candle.ts) {
            by_ts.insert(candle.ts, candle);
        }
    }

    by_ts
        .into_values()
        .map(|candle| NormalizedRow::from_candle(candle, key))
        .collect()
}
