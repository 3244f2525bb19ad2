//! Global error capture: panics and failed background tasks become error entries.
//!
//! The host wires this once at startup with [`install_panic_capture`] and spawns
//! fallible background work through [`spawn_captured`].

use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt;
use std::future::Future;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;

use crate::telemetry::recorder::TelemetryRecorder;
use crate::telemetry::types::{Context, LogLevel};

pub const PANIC_MESSAGE: &str = "Unhandled panic";
pub const TASK_FAILURE_MESSAGE: &str = "Unhandled task failure";

static PANIC_HOOK_INSTALLED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalErrorKind {
    Panic,
    TaskFailure,
}

/// Structured payload of an uncaught failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FatalError {
    pub kind: FatalErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub stack: Option<String>,
}

impl FatalError {
    pub fn from_panic(payload: &(dyn Any + Send), location: Option<&Location<'_>>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self {
            kind: FatalErrorKind::Panic,
            message,
            file: location.map(|l| l.file().to_string()),
            line: location.map(|l| l.line()),
            column: location.map(|l| l.column()),
            stack: captured_backtrace(),
        }
    }

    pub fn task_failure(reason: impl Into<String>) -> Self {
        Self {
            kind: FatalErrorKind::TaskFailure,
            message: reason.into(),
            file: None,
            line: None,
            column: None,
            stack: None,
        }
    }

    fn into_context(self) -> Context {
        let mut context = Context::new();
        let message_key = match self.kind {
            FatalErrorKind::Panic => "message",
            FatalErrorKind::TaskFailure => "reason",
        };
        context.insert(message_key.to_string(), json!(self.message));
        if let Some(file) = self.file {
            context.insert("filename".to_string(), json!(file));
        }
        if let Some(line) = self.line {
            context.insert("lineno".to_string(), json!(line));
        }
        if let Some(column) = self.column {
            context.insert("colno".to_string(), json!(column));
        }
        if let Some(stack) = self.stack {
            context.insert("stack".to_string(), json!(stack));
        }
        context
    }
}

/// Only when `RUST_BACKTRACE` asks for one.
fn captured_backtrace() -> Option<String> {
    let backtrace = Backtrace::capture();
    match backtrace.status() {
        BacktraceStatus::Captured => Some(backtrace.to_string()),
        _ => None,
    }
}

impl TelemetryRecorder {
    /// Record an uncaught failure as an error entry.
    pub fn capture_fatal(&self, fatal: FatalError) {
        let message = match fatal.kind {
            FatalErrorKind::Panic => PANIC_MESSAGE,
            FatalErrorKind::TaskFailure => TASK_FAILURE_MESSAGE,
        };
        self.record(LogLevel::Error, message, Some(fatal.into_context()));
    }
}

/// Route every panic in the process to `recorder`, then to the previously
/// installed hook. Only the first call per process installs; later calls
/// return `false` and change nothing.
pub fn install_panic_capture(recorder: Arc<TelemetryRecorder>) -> bool {
    if PANIC_HOOK_INSTALLED.swap(true, Ordering::SeqCst) {
        return false;
    }
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        recorder.capture_fatal(FatalError::from_panic(info.payload(), info.location()));
        previous(info);
    }));
    true
}

/// Spawn fallible background work; an `Err` outcome is recorded as a task failure.
pub fn spawn_captured<F, E>(recorder: Arc<TelemetryRecorder>, future: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(err) = future.await {
            recorder.capture_fatal(FatalError::task_failure(err.to_string()));
        }
    })
}
