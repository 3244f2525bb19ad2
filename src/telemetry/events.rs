//! Record schema: log entries and performance metrics.
//!
//! The serialized form of [`LogEntry`] is the webhook payload, so its keys
//! (`timestamp`, `level`, `message`, `context`, `url`) are part of the wire
//! contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::telemetry::types::{format_timestamp, rfc3339_millis, Context, LogLevel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde(default, rename = "url", skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl LogEntry {
    pub fn new(
        timestamp: DateTime<Utc>,
        level: LogLevel,
        message: impl Into<String>,
        context: Option<Context>,
        origin: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            context,
            origin,
        }
    }

    pub fn timestamp_string(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub name: String,
    #[serde(rename = "duration")]
    pub duration_ms: f64,
    #[serde(with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Context>,
}

impl PerformanceMetric {
    /// Negative and NaN durations are stored as `0`.
    pub fn new(
        timestamp: DateTime<Utc>,
        name: impl Into<String>,
        duration_ms: f64,
        metadata: Option<Context>,
    ) -> Self {
        Self {
            name: name.into(),
            duration_ms: normalize_duration(duration_ms),
            timestamp,
            metadata,
        }
    }
}

fn normalize_duration(duration_ms: f64) -> f64 {
    if duration_ms.is_nan() || duration_ms < 0.0 {
        0.0
    } else {
        duration_ms
    }
}
