use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// One well-formed line of the input file.
///
/// Fields are kept exactly as they appear between the ` - ` separators;
/// nothing is trimmed or normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// 0-based index of the line this record was parsed from.
    #[serde(skip)]
    pub line: usize,
    pub timestamp: String,
    pub service: String,
    pub level: String,
    pub message: String,
}

/// Records in input order, keyed by their originating line.
///
/// Malformed lines leave gaps in the line numbering. Serializes as an
/// object mapping line index to record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogCollection {
    records: Vec<LogRecord>,
}

impl LogCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record. Line indices must be pushed in ascending order;
    /// the parser and the date filter both walk input in line order.
    pub(crate) fn push(&mut self, record: LogRecord) {
        debug_assert!(self.records.last().is_none_or(|last| last.line < record.line));
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecord> {
        self.records.iter()
    }

    /// Look up the record parsed from `line`, if that line was well-formed.
    pub fn get(&self, line: usize) -> Option<&LogRecord> {
        self.records
            .binary_search_by_key(&line, |r| r.line)
            .ok()
            .map(|idx| &self.records[idx])
    }

    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.iter().map(|r| r.line)
    }
}

/// Sorted by line; the first record seen for a repeated line wins.
impl FromIterator<LogRecord> for LogCollection {
    fn from_iter<I: IntoIterator<Item = LogRecord>>(iter: I) -> Self {
        let mut records: Vec<LogRecord> = iter.into_iter().collect();
        records.sort_by_key(|r| r.line);
        records.dedup_by_key(|r| r.line);
        LogCollection { records }
    }
}

impl<'a> IntoIterator for &'a LogCollection {
    type Item = &'a LogRecord;
    type IntoIter = std::slice::Iter<'a, LogRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for LogCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.line, record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: usize, message: &str) -> LogRecord {
        LogRecord {
            line,
            timestamp: "2023-01-01".to_string(),
            service: "auth".to_string(),
            level: "INFO".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn get_skips_missing_lines() {
        let collection: LogCollection = vec![record(0, "a"), record(2, "c")].into_iter().collect();
        assert_eq!(collection.get(0).map(|r| r.message.as_str()), Some("a"));
        assert!(collection.get(1).is_none());
        assert_eq!(collection.get(2).map(|r| r.message.as_str()), Some("c"));
        assert_eq!(collection.lines().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn collect_orders_by_line() {
        let collection: LogCollection =
            vec![record(5, "e"), record(1, "a"), record(3, "c"), record(1, "dup")].into_iter().collect();
        assert_eq!(collection.lines().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(collection.get(1).map(|r| r.message.as_str()), Some("a"));
        assert_eq!(collection.get(3).map(|r| r.message.as_str()), Some("c"));
        assert_eq!(collection.get(5).map(|r| r.message.as_str()), Some("e"));
    }

    #[test]
    fn serializes_as_map_keyed_by_line() {
        let collection: LogCollection = vec![record(3, "hello")].into_iter().collect();
        let json = serde_json::to_value(&collection).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "3": {
                    "timestamp": "2023-01-01",
                    "service": "auth",
                    "level": "INFO",
                    "message": "hello"
                }
            })
        );
    }
}
