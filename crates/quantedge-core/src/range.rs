use crate::domain::interval::Interval;
use crate::domain::timestamp::UtcDateTime;
use crate::error::ConfigError;

/// Half-open UTC time range `[start, end)`.
///
/// `start == end` models the empty range; an inverted pair is rejected
/// at construction so inner components never see one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    start: UtcDateTime,
    end: UtcDateTime,
}

impl TimeRange {
    pub fn new(start: UtcDateTime, end: UtcDateTime) -> Result<Self, ConfigError> {
        if start > end {
            return Err(ConfigError::InvertedRange {
                start: start.format_rfc3339(),
                end: end.format_rfc3339(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(self) -> UtcDateTime {
        self.start
    }

    pub fn end(self) -> UtcDateTime {
        self.end
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Whether `ts` falls within the closed interval `[start, end]`.
    ///
    /// Clipping is inclusive on both ends: a candle opening exactly at
    /// `end` is kept.
    pub fn contains_inclusive(self, ts: UtcDateTime) -> bool {
        ts >= self.start && ts <= self.end
    }
}

/// Split a range into provider-safe sub-windows for `interval`.
///
/// Windows are produced lazily, are contiguous and non-overlapping, and
/// the final window is clipped to `range.end`.
pub fn split(range: TimeRange, interval: Interval) -> Windows {
    Windows {
        cursor: range.start(),
        end: range.end(),
        step: interval.max_request_span(),
    }
}

/// Lazy sub-window sequence; see [`split`].
#[derive(Debug, Clone)]
pub struct Windows {
    cursor: UtcDateTime,
    end: UtcDateTime,
    step: time::Duration,
}

impl Iterator for Windows {
    type Item = TimeRange;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }
        let window_end = self.cursor.saturating_add(self.step).min(self.end);
        let window = TimeRange {
            start: self.cursor,
            end: window_end,
        };
        self.cursor = window_end;
        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(input: &str) -> UtcDateTime {
        UtcDateTime::parse(input).expect("test timestamp must parse")
    }

    #[test]
    fn rejects_inverted_range() {
        let err = TimeRange::new(ts("2024-02-01T00:00:00Z"), ts("2024-01-01T00:00:00Z"))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::InvertedRange { .. }));
    }

    #[test]
    fn empty_range_yields_no_windows() {
        let range =
            TimeRange::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T00:00:00Z")).unwrap();
        assert!(range.is_empty());
        assert_eq!(split(range, Interval::OneHour).count(), 0);
    }

    #[test]
    fn windows_are_contiguous_and_cover_the_range() {
        let range =
            TimeRange::new(ts("2024-01-01T00:00:00Z"), ts("2024-03-15T07:30:00Z")).unwrap();

        for interval in Interval::ALL {
            let windows: Vec<TimeRange> = split(range, interval).collect();
            assert!(!windows.is_empty());
            assert_eq!(windows.first().unwrap().start(), range.start());
            assert_eq!(windows.last().unwrap().end(), range.end());

            for pair in windows.windows(2) {
                assert_eq!(pair[0].end(), pair[1].start(), "gap or overlap at {interval}");
            }
            for window in &windows {
                assert!(window.start() < window.end());
                let span = window.end().into_inner() - window.start().into_inner();
                assert!(span <= interval.max_request_span());
            }
        }
    }

    #[test]
    fn final_window_is_clipped() {
        let range =
            TimeRange::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-01T13:00:00Z")).unwrap();
        let windows: Vec<TimeRange> = split(range, Interval::OneMinute).collect();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].end(), range.end());
        let tail = windows[1].end().into_inner() - windows[1].start().into_inner();
        assert_eq!(tail, time::Duration::hours(1));
    }

    #[test]
    fn inclusive_clip_keeps_end_boundary() {
        let range =
            TimeRange::new(ts("2024-01-01T00:00:00Z"), ts("2024-01-02T00:00:00Z")).unwrap();
        assert!(range.contains_inclusive(ts("2024-01-02T00:00:00Z")));
        assert!(!range.contains_inclusive(ts("2024-01-02T00:00:01Z")));
    }
}
