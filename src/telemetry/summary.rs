//! Error aggregation over the log buffer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::telemetry::events::LogEntry;
use crate::telemetry::types::LogLevel;

/// How many of the newest errors a summary carries
pub const RECENT_ERRORS: usize = 10;

/// Bucket for messages without a usable prefix
pub const UNKNOWN_ERROR_TYPE: &str = "Unknown";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorSummary {
    pub total_errors: usize,
    pub recent_errors: Vec<LogEntry>,
    pub error_types: BTreeMap<String, usize>,
}

/// Text before the first `:`; [`UNKNOWN_ERROR_TYPE`] when there is no colon or
/// nothing precedes it.
pub fn error_type(message: &str) -> &str {
    match message.split_once(':') {
        Some((prefix, _)) if !prefix.is_empty() => prefix,
        _ => UNKNOWN_ERROR_TYPE,
    }
}

/// Summarize every error-level entry in `entries` (oldest first).
pub fn summarize<'a, I>(entries: I) -> ErrorSummary
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let errors: Vec<&LogEntry> = entries
        .into_iter()
        .filter(|entry| entry.level == LogLevel::Error)
        .collect();

    let mut error_types = BTreeMap::new();
    for entry in &errors {
        *error_types
            .entry(error_type(&entry.message).to_string())
            .or_insert(0) += 1;
    }

    let skip = errors.len().saturating_sub(RECENT_ERRORS);
    ErrorSummary {
        total_errors: errors.len(),
        recent_errors: errors[skip..].iter().map(|e| (*e).clone()).collect(),
        error_types,
    }
}
