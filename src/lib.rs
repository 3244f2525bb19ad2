//! Debug Recorder
//!
//! An in-process debug log and performance metric recorder. Keeps bounded
//! recent history, aggregates errors by type, renders a text report, and
//! forwards each log entry to an optional webhook without ever failing the
//! caller.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod telemetry;

pub use telemetry::{LogLevel, TelemetryRecorder};
