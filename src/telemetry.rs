//! Telemetry domain: bounded log/metric recording, error aggregation, reports,
//! best-effort export and global error capture.

mod types;

pub mod buffer;
pub mod capture;
pub mod environment;
pub mod events;
pub mod export;
pub mod recorder;
pub mod report;
pub mod summary;

pub use capture::{install_panic_capture, spawn_captured, FatalError, FatalErrorKind};
pub use environment::{HostEnvironment, LocationProvider};
pub use events::{LogEntry, PerformanceMetric};
pub use export::{LogExporter, NoopExporter, WebhookExporter};
pub use recorder::{RecorderBuilder, TelemetryRecorder, DEFAULT_RECENT_LIMIT};
pub use report::DebugReport;
pub use summary::{error_type, ErrorSummary};
pub use types::{format_timestamp, Context, LogLevel};
