//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::RecorderError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &RecorderError) -> String {
    match e {
        RecorderError::ConfigError(_) => format!(
            "{}\n(check the --config file and DEBUG_RECORDER_* environment variables)",
            e
        ),
        RecorderError::IoError(err) => format!("Failed to read input: {}", err),
        other => other.to_string(),
    }
}
