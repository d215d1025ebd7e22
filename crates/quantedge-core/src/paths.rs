//! Deterministic object path construction.

use time::macros::format_description;
use time::Date;

use crate::domain::interval::Interval;
use crate::domain::symbol::Symbol;

/// Build `prefix/symbol/interval/YYYY-MM-DD/data.parquet`.
///
/// `as_of` is the calendar date of the run instant, not of the data
/// itself; re-running the same symbol/interval on the same day
/// overwrites the same object.
pub fn build_object_path(
    prefix: &str,
    symbol: &Symbol,
    interval: Interval,
    as_of: Date,
) -> String {
    let date_part = as_of
        .format(format_description!("[year]-[month]-[day]"))
        .expect("calendar date must format");

    let prefix_clean = prefix.trim_matches('/');
    let mut components: Vec<&str> = Vec::with_capacity(4);
    if !prefix_clean.is_empty() {
        components.push(prefix_clean);
    }
    components.push(symbol.as_str());
    components.push(interval.as_str());
    components.push(&date_part);

    format!("{}/data.parquet", components.join("/"))
}
