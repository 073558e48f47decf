use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::record::LogCollection;

/// Timestamp with a time of day; tried first.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date only, meaning midnight; tried when [`DATETIME_FORMAT`] fails.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// `9` marks an ASCII digit, anything else must match literally.
const DATETIME_SHAPE: &str = "9999-99-99 99:99:99";
const DATE_SHAPE: &str = "9999-99-99";

fn has_shape(value: &str, shape: &str) -> bool {
    value.len() == shape.len()
        && value.bytes().zip(shape.bytes()).all(|(v, s)| match s {
            b'9' => v.is_ascii_digit(),
            _ => v == s,
        })
}

/// Which end of a requested range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Start => f.write_str("Start"),
            Boundary::End => f.write_str("End"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A range boundary matched neither accepted format. Recoverable: the
    /// filter is simply not performed.
    #[error("{which} time not in the %Y-%m-%d format or %Y-%m-%d %H:%M:%S format")]
    BoundaryFormat { which: Boundary },

    /// A record carried a timestamp in neither accepted format.
    #[error("Line {line} has unparseable timestamp {timestamp:?}")]
    RecordTimestamp { line: usize, timestamp: String },
}

/// Parse `value` as `YYYY-MM-DD HH:MM:SS`, falling back to `YYYY-MM-DD`.
///
/// Both formats are fixed-width and zero-padded. Surrounding whitespace,
/// signs and leap seconds are rejected.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if has_shape(value, DATETIME_SHAPE) {
        NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
            .ok()
            .filter(|ts| ts.nanosecond() < 1_000_000_000)
    } else if has_shape(value, DATE_SHAPE) {
        NaiveDate::parse_from_str(value, DATE_FORMAT)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    } else {
        None
    }
}

/// An ordered, validated pair of exclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    /// Parse both bounds, start first. Reversed bounds are swapped.
    pub fn parse(start: &str, end: &str) -> Result<Self, FilterError> {
        let start = parse_timestamp(start).ok_or(FilterError::BoundaryFormat { which: Boundary::Start })?;
        let end = parse_timestamp(end).ok_or(FilterError::BoundaryFormat { which: Boundary::End })?;
        Ok(Self::new(start, end))
    }

    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        if start > end {
            DateRange { start: end, end: start }
        } else {
            DateRange { start, end }
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Strictly after start and strictly before end.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        ts > self.start && ts < self.end
    }
}

/// Records whose timestamps fall strictly between `start` and `end`.
///
/// **Returns**
/// - `Err(FilterError::BoundaryFormat)` when a boundary is unparseable.
/// - `Err(FilterError::RecordTimestamp)` on the first record whose
///   timestamp is unparseable; no partial result is returned.
pub fn filter_by_date(start: &str, end: &str, records: &LogCollection) -> Result<LogCollection, FilterError> {
    let range = DateRange::parse(start, end)?;
    filter_in_range(&range, records)
}

/// Same as [`filter_by_date`] with already-parsed bounds.
pub fn filter_in_range(range: &DateRange, records: &LogCollection) -> Result<LogCollection, FilterError> {
    let mut kept = LogCollection::new();
    for record in records {
        let ts = parse_timestamp(&record.timestamp).ok_or_else(|| FilterError::RecordTimestamp {
            line: record.line,
            timestamp: record.timestamp.clone(),
        })?;
        if range.contains(ts) {
            kept.push(record.clone());
        }
    }
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_lines;

    const SAMPLE: &str = "2023-01-01 10:00:00 - auth - ERROR - login failed\n\
                          2023-01-01 11:00:00 - auth - INFO - login ok\n\
                          2023-01-01 12:00:00 - auth - ERROR - login failed\n";

    fn sample() -> LogCollection {
        parse_lines(SAMPLE, "test.log").records
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).unwrap()
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2023-01-01 10:30:15"), Some(dt("2023-01-01 10:30:15")));
        assert_eq!(parse_timestamp("2023-01-01"), Some(dt("2023-01-01 00:00:00")));
        assert_eq!(parse_timestamp("01/01/2023"), None);
        assert_eq!(parse_timestamp("2023-01-01T10:30:15"), None);
        assert_eq!(parse_timestamp("2023-02-30"), None);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp(" 2023-01-01"), None);
        assert_eq!(parse_timestamp("2023-01-01 "), None);
        assert_eq!(parse_timestamp("+2023-01-01"), None);
        assert_eq!(parse_timestamp("2023-01-01 10:00:60"), None);
        assert_eq!(parse_timestamp("2023-01-01  10:00:00"), None);
        assert_eq!(parse_timestamp("2023-1-01"), None);
    }

    #[test]
    fn test_filter_midnight_to_half_past_eleven() {
        let kept = filter_by_date("2023-01-01", "2023-01-01 11:30:00", &sample()).unwrap();
        assert_eq!(kept.lines().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(kept.get(1).unwrap().message, "login ok");
    }

    #[test]
    fn test_filter_bounds_are_exclusive() {
        let records = sample();
        let kept = filter_by_date("2023-01-01 10:00:00", "2023-01-01 12:00:00", &records).unwrap();
        assert_eq!(kept.lines().collect::<Vec<_>>(), vec![1]);

        let kept = filter_by_date("2023-01-01 11:00:00", "2023-01-01 11:00:00", &records).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn test_filter_swap_invariant() {
        let records = sample();
        for (a, b) in [
            ("2023-01-01", "2023-01-01 11:30:00"),
            ("2023-01-01 09:00:00", "2023-01-02"),
            ("2023-01-01 10:00:00", "2023-01-01 12:00:00"),
        ] {
            assert_eq!(
                filter_by_date(a, b, &records).unwrap(),
                filter_by_date(b, a, &records).unwrap()
            );
        }
    }

    #[test]
    fn test_filter_keeps_line_indices_and_order() {
        let input = "2023-03-01 - api - INFO - a\n\
                     junk\n\
                     2023-03-02 - api - INFO - b\n\
                     2023-03-05 - api - INFO - c\n\
                     2023-03-03 - api - INFO - d\n";
        let records = parse_lines(input, "test.log").records;
        let kept = filter_by_date("2023-03-01 12:00:00", "2023-03-04", &records).unwrap();
        assert_eq!(kept.lines().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_filter_rejects_bad_boundaries() {
        let records = sample();
        assert_eq!(
            filter_by_date("yesterday", "2023-01-02", &records),
            Err(FilterError::BoundaryFormat { which: Boundary::Start })
        );
        assert_eq!(
            filter_by_date("2023-01-01", "tomorrow", &records),
            Err(FilterError::BoundaryFormat { which: Boundary::End })
        );
        for loose in [" 2023-01-01", "+2023-01-01", "2023-01-01 10:00:60"] {
            assert_eq!(
                filter_by_date(loose, "2023-01-02", &records),
                Err(FilterError::BoundaryFormat { which: Boundary::Start })
            );
            assert_eq!(
                filter_by_date("2023-01-01", loose, &records),
                Err(FilterError::BoundaryFormat { which: Boundary::End })
            );
        }
        // start is checked first
        assert_eq!(
            filter_by_date("nope", "nope", &records),
            Err(FilterError::BoundaryFormat { which: Boundary::Start })
        );
    }

    #[test]
    fn test_boundary_error_message() {
        let err = FilterError::BoundaryFormat { which: Boundary::End };
        assert_eq!(
            err.to_string(),
            "End time not in the %Y-%m-%d format or %Y-%m-%d %H:%M:%S format"
        );
    }

    #[test]
    fn test_filter_fails_on_bad_record_timestamp() {
        let input = "2023-01-01 10:00:00 - auth - INFO - ok\n\
                     Jan 1 10:05:00 - auth - INFO - odd clock\n";
        let records = parse_lines(input, "test.log").records;
        assert_eq!(
            filter_by_date("2023-01-01", "2023-01-02", &records),
            Err(FilterError::RecordTimestamp { line: 1, timestamp: "Jan 1 10:05:00".to_string() })
        );

        let records = parse_lines("2023-01-01 23:59:60 - auth - INFO - leap
", "test.log").records;
        assert_eq!(
            filter_by_date("2023-01-01", "2023-01-02", &records),
            Err(FilterError::RecordTimestamp { line: 0, timestamp: "2023-01-01 23:59:60".to_string() })
        );
    }

    #[test]
    fn test_date_range_orders_bounds() {
        let range = DateRange::parse("2023-01-02", "2023-01-01").unwrap();
        assert_eq!(range.start(), dt("2023-01-01 00:00:00"));
        assert_eq!(range.end(), dt("2023-01-02 00:00:00"));
        assert!(range.contains(dt("2023-01-01 00:00:01")));
        assert!(!range.contains(dt("2023-01-02 00:00:00")));
    }
}
