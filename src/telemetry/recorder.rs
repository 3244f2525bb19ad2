//! The telemetry recorder: bounded log and metric history with error aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::config::{RecorderConfig, DEFAULT_MAX_LOGS, DEFAULT_MAX_METRICS};
use crate::telemetry::buffer::BoundedBuffer;
use crate::telemetry::environment::HostEnvironment;
use crate::telemetry::events::{LogEntry, PerformanceMetric};
use crate::telemetry::export::{LogExporter, NoopExporter};
use crate::telemetry::report::{DebugReport, REPORT_ITEMS};
use crate::telemetry::summary::{summarize, ErrorSummary};
use crate::telemetry::types::{Context, LogLevel};

/// Default `limit` for [`TelemetryRecorder::recent_logs`] and
/// [`TelemetryRecorder::recent_metrics`]
pub const DEFAULT_RECENT_LIMIT: i64 = 50;

/// Bounded, thread-safe debug log and metric recorder.
///
/// Create one at host startup, keep it in an `Arc`, and hand references to the
/// code that logs. Both buffers sit behind a single lock, so append-and-evict is
/// atomic and every read sees a consistent snapshot. Mirroring and export run
/// after the lock is released.
pub struct TelemetryRecorder {
    state: Mutex<RecorderState>,
    environment: HostEnvironment,
    exporter: Arc<dyn LogExporter>,
}

struct RecorderState {
    logs: BoundedBuffer<LogEntry>,
    metrics: BoundedBuffer<PerformanceMetric>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl RecorderState {
    /// Wall-clock now, never earlier than the previous record.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

pub struct RecorderBuilder {
    max_logs: usize,
    max_metrics: usize,
    environment: HostEnvironment,
    exporter: Arc<dyn LogExporter>,
}

impl Default for RecorderBuilder {
    fn default() -> Self {
        Self {
            max_logs: DEFAULT_MAX_LOGS,
            max_metrics: DEFAULT_MAX_METRICS,
            environment: HostEnvironment::default(),
            exporter: Arc::new(NoopExporter),
        }
    }
}

impl RecorderBuilder {
    /// Capacities and runtime mode from `config`. The exporter is left as a no-op;
    /// build a [`WebhookExporter`](crate::telemetry::WebhookExporter) separately.
    pub fn from_config(config: &RecorderConfig) -> Self {
        Self {
            max_logs: config.max_logs,
            max_metrics: config.max_metrics,
            environment: HostEnvironment::new(config.environment),
            ..Self::default()
        }
    }

    pub fn max_logs(mut self, max_logs: usize) -> Self {
        self.max_logs = max_logs;
        self
    }

    pub fn max_metrics(mut self, max_metrics: usize) -> Self {
        self.max_metrics = max_metrics;
        self
    }

    pub fn environment(mut self, environment: HostEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn exporter(mut self, exporter: Arc<dyn LogExporter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn build(self) -> TelemetryRecorder {
        TelemetryRecorder {
            state: Mutex::new(RecorderState {
                logs: BoundedBuffer::new(self.max_logs),
                metrics: BoundedBuffer::new(self.max_metrics),
                last_timestamp: None,
            }),
            environment: self.environment,
            exporter: self.exporter,
        }
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    /// Default capacities, production mode, no export.
    pub fn new() -> Self {
        RecorderBuilder::default().build()
    }

    pub fn builder() -> RecorderBuilder {
        RecorderBuilder::default()
    }

    /// Append a log entry, mirror it in development mode, and hand it to the exporter.
    pub fn record(&self, level: LogLevel, message: impl Into<String>, context: Option<Context>) {
        // Caller conversions run before the lock; a panic in one must reach
        // the panic hook with the lock free.
        let message = message.into();
        let origin = self.environment.current_location();
        let entry = {
            let mut state = self.state.lock();
            let entry = LogEntry::new(state.next_timestamp(), level, message, context, origin);
            state.logs.push(entry.clone());
            entry
        };

        if self.environment.is_development() {
            mirror(&entry);
        }
        self.exporter.export(&entry);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.record(LogLevel::Info, message, None);
    }

    pub fn info_with(&self, message: impl Into<String>, context: Context) {
        self.record(LogLevel::Info, message, Some(context));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.record(LogLevel::Warn, message, None);
    }

    pub fn warn_with(&self, message: impl Into<String>, context: Context) {
        self.record(LogLevel::Warn, message, Some(context));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.record(LogLevel::Error, message, None);
    }

    pub fn error_with(&self, message: impl Into<String>, context: Context) {
        self.record(LogLevel::Error, message, Some(context));
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.record(LogLevel::Debug, message, None);
    }

    pub fn debug_with(&self, message: impl Into<String>, context: Context) {
        self.record(LogLevel::Debug, message, Some(context));
    }

    /// Append a performance metric. Negative or NaN durations are stored as `0`.
    pub fn record_metric(&self, name: impl Into<String>, duration_ms: f64, metadata: Option<Context>) {
        let name = name.into();
        let mut state = self.state.lock();
        let metric = PerformanceMetric::new(state.next_timestamp(), name, duration_ms, metadata);
        state.metrics.push(metric);
    }

    /// The newest `limit` log entries, oldest first. Non-positive limits yield nothing.
    pub fn recent_logs(&self, limit: i64) -> Vec<LogEntry> {
        self.state.lock().logs.tail(clamp_limit(limit))
    }

    /// The newest `limit` metrics, oldest first. Non-positive limits yield nothing.
    pub fn recent_metrics(&self, limit: i64) -> Vec<PerformanceMetric> {
        self.state.lock().metrics.tail(clamp_limit(limit))
    }

    pub fn error_summary(&self) -> ErrorSummary {
        summarize(self.state.lock().logs.iter())
    }

    /// Snapshot of everything the text report shows, taken under one lock.
    pub fn debug_report(&self) -> DebugReport {
        let state = self.state.lock();
        DebugReport {
            summary: summarize(state.logs.iter()),
            recent_logs: state.logs.tail(REPORT_ITEMS),
            recent_metrics: state.metrics.tail(REPORT_ITEMS),
        }
    }

    pub fn report(&self) -> String {
        self.debug_report().to_string()
    }

    pub fn log_count(&self) -> usize {
        self.state.lock().logs.len()
    }

    pub fn metric_count(&self) -> usize {
        self.state.lock().metrics.len()
    }

    pub fn max_logs(&self) -> usize {
        self.state.lock().logs.capacity()
    }

    pub fn max_metrics(&self) -> usize {
        self.state.lock().metrics.capacity()
    }

    pub fn environment(&self) -> &HostEnvironment {
        &self.environment
    }
}

fn clamp_limit(limit: i64) -> usize {
    if limit <= 0 {
        0
    } else {
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

fn mirror(entry: &LogEntry) {
    let context = entry
        .context
        .clone()
        .map(serde_json::Value::Object)
        .unwrap_or_default();
    let label = entry.level.label();
    match entry.level {
        LogLevel::Debug => {
            debug!(target: "debug_recorder::mirror", %context, "[Debug] {}: {}", label, entry.message)
        }
        LogLevel::Info => {
            info!(target: "debug_recorder::mirror", %context, "[Debug] {}: {}", label, entry.message)
        }
        LogLevel::Warn => {
            warn!(target: "debug_recorder::mirror", %context, "[Debug] {}: {}", label, entry.message)
        }
        LogLevel::Error => {
            error!(target: "debug_recorder::mirror", %context, "[Debug] {}: {}", label, entry.message)
        }
    }
}
