//! Error types for the debug recorder.
//!
//! None of these ever escape the recording or read paths of
//! [`TelemetryRecorder`](crate::telemetry::TelemetryRecorder). They surface at
//! configuration time, in the host binary, and at the export boundary, where
//! they are logged and dropped.

use thiserror::Error;

/// Host-facing errors (configuration, logging setup, binary I/O)
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Export error: {0}")]
    ExportError(#[from] ExportError),
}

impl From<config::ConfigError> for RecorderError {
    fn from(err: config::ConfigError) -> Self {
        RecorderError::ConfigError(err.to_string())
    }
}

/// Failures of a single webhook delivery
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to serialize log entry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Webhook responded with status {0}")]
    Status(u16),

    #[error("No async runtime available to deliver log entry")]
    NoRuntime,
}
