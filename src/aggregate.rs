use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::record::{LogCollection, LogRecord};

/// Level whose messages are ranked by [`most_common_error_messages`].
pub const ERROR_LEVEL: &str = "ERROR";

/// Aggregate statistics for one input file.
///
/// Field names match the keys of the persisted `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub file_name: String,
    pub log_level_count: BTreeMap<String, usize>,
    pub services_count: BTreeMap<String, usize>,
    pub most_common_log: Vec<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("no valid log records to summarize")]
    EmptyCollection,
}

/// How the message frequency table behind [`most_common_error_messages`]
/// is populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorCountPolicy {
    /// Any record seeds (or resets) its message at 1; only an `ERROR` record
    /// whose message is already tabled increments it. Matches the output of
    /// earlier releases of this tool.
    #[default]
    FirstSeen,
    /// Only `ERROR` records are counted, seeded at their first occurrence.
    ErrorOnly,
}

impl ErrorCountPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCountPolicy::FirstSeen => "first_seen",
            ErrorCountPolicy::ErrorOnly => "error_only",
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown error count policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for ErrorCountPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first_seen" => Ok(ErrorCountPolicy::FirstSeen),
            "error_only" => Ok(ErrorCountPolicy::ErrorOnly),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}

fn count_by<'a, F>(records: &'a LogCollection, key: F) -> BTreeMap<String, usize>
where
    F: Fn(&'a LogRecord) -> &'a str,
{
    records.iter().fold(BTreeMap::new(), |mut counts, record| {
        *counts.entry(key(record).to_string()).or_insert(0) += 1;
        counts
    })
}

/// Number of records per distinct `level` value.
pub fn count_by_level(records: &LogCollection) -> BTreeMap<String, usize> {
    count_by(records, |r| r.level.as_str())
}

/// Number of records per distinct `service` value.
pub fn count_by_service(records: &LogCollection) -> BTreeMap<String, usize> {
    count_by(records, |r| r.service.as_str())
}

/// Messages tied for the highest frequency, sorted.
///
/// **Returns**
/// - `Err(AggregateError::EmptyCollection)` if `records` is empty.
/// - Under [`ErrorCountPolicy::ErrorOnly`], an empty list when no record
///   has level `ERROR`.
pub fn most_common_error_messages(
    records: &LogCollection,
    policy: ErrorCountPolicy,
) -> Result<Vec<String>, AggregateError> {
    if records.is_empty() {
        return Err(AggregateError::EmptyCollection);
    }

    let mut freq: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        let message = record.message.as_str();
        let is_error = record.level == ERROR_LEVEL;
        match policy {
            ErrorCountPolicy::FirstSeen => {
                if is_error && freq.contains_key(message) {
                    *freq.entry(message).or_insert(0) += 1;
                } else {
                    freq.insert(message, 1);
                }
            }
            ErrorCountPolicy::ErrorOnly if is_error => {
                *freq.entry(message).or_insert(0) += 1;
            }
            ErrorCountPolicy::ErrorOnly => {}
        }
    }

    let max = match freq.values().max() {
        Some(max) => *max,
        None => return Ok(Vec::new()),
    };
    Ok(freq
        .into_iter()
        .filter(|(_, count)| *count == max)
        .map(|(message, _)| message.to_string())
        .collect())
}

/// Build the [`Summary`] for `records` read from `file_name`.
pub fn summarize(
    file_name: &str,
    records: &LogCollection,
    policy: ErrorCountPolicy,
) -> Result<Summary, AggregateError> {
    let most_common_log = most_common_error_messages(records, policy)?;
    Ok(Summary {
        file_name: file_name.to_string(),
        log_level_count: count_by_level(records),
        services_count: count_by_service(records),
        most_common_log,
    })
}
