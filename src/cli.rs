//! CLI domain: parse, ingest, route, and output only.
//! The route table drives a [`TelemetryRecorder`](crate::telemetry::TelemetryRecorder)
//! built from configuration.

mod ingest;
mod output;
mod parse;
mod route;

pub use ingest::{ingest, IngestStats, InputEvent};
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use route::RunContext;
