//! JSON-lines event input for the CLI.

use serde::Deserialize;
use std::io::BufRead;
use tracing::warn;

use crate::error::RecorderError;
use crate::telemetry::{Context, LogLevel, TelemetryRecorder};

/// One input line: `{"kind":"log",...}` or `{"kind":"metric",...}`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InputEvent {
    Log {
        level: LogLevel,
        message: String,
        #[serde(default)]
        context: Option<Context>,
    },
    Metric {
        name: String,
        duration: f64,
        #[serde(default)]
        metadata: Option<Context>,
    },
}

impl InputEvent {
    pub fn apply(self, recorder: &TelemetryRecorder) {
        match self {
            InputEvent::Log {
                level,
                message,
                context,
            } => recorder.record(level, message, context),
            InputEvent::Metric {
                name,
                duration,
                metadata,
            } => recorder.record_metric(name, duration, metadata),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub logs: usize,
    pub metrics: usize,
    pub skipped: usize,
}

/// Feed every line of `reader` into `recorder`. Blank lines are ignored and
/// malformed lines (bad UTF-8 included) are logged and skipped; only read
/// failures are errors.
pub fn ingest<R: BufRead>(
    reader: R,
    recorder: &TelemetryRecorder,
) -> Result<IngestStats, RecorderError> {
    let mut stats = IngestStats::default();
    for (index, bytes) in reader.split(b'\n').enumerate() {
        let bytes = bytes?;
        let line = match std::str::from_utf8(&bytes) {
            Ok(line) => line,
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping input line that is not UTF-8");
                stats.skipped += 1;
                continue;
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<InputEvent>(trimmed) {
            Ok(event) => {
                match event {
                    InputEvent::Log { .. } => stats.logs += 1,
                    InputEvent::Metric { .. } => stats.metrics += 1,
                }
                event.apply(recorder);
            }
            Err(err) => {
                warn!(line = index + 1, error = %err, "skipping malformed input line");
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}
