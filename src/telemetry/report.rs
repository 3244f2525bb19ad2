//! Human-readable debug report.

use std::fmt;

use crate::telemetry::events::{LogEntry, PerformanceMetric};
use crate::telemetry::summary::ErrorSummary;

/// How many logs and metrics a report lists
pub const REPORT_ITEMS: usize = 10;

/// Snapshot rendered by [`fmt::Display`] as a markdown-style report.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugReport {
    pub summary: ErrorSummary,
    pub recent_logs: Vec<LogEntry>,
    pub recent_metrics: Vec<PerformanceMetric>,
}

impl fmt::Display for DebugReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let error_types =
            serde_json::to_string_pretty(&self.summary.error_types).map_err(|_| fmt::Error)?;

        writeln!(f, "# Debug Report")?;
        writeln!(f)?;
        writeln!(f, "## Error Summary")?;
        writeln!(f, "- Total Errors: {}", self.summary.total_errors)?;
        writeln!(f, "- Error Types: {}", error_types)?;
        writeln!(f)?;

        writeln!(f, "## Recent Errors")?;
        for error in &self.summary.recent_errors {
            writeln!(f, "- {}: {}", error.timestamp_string(), error.message)?;
        }
        writeln!(f)?;

        writeln!(f, "## Recent Logs")?;
        for log in &self.recent_logs {
            writeln!(
                f,
                "- [{}] {}: {}",
                log.level.label(),
                log.timestamp_string(),
                log.message
            )?;
        }
        writeln!(f)?;

        write!(f, "## Performance Metrics")?;
        for metric in &self.recent_metrics {
            write!(f, "\n- {}: {}ms", metric.name, metric.duration_ms)?;
        }
        Ok(())
    }
}
