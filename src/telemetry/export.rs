//! Best-effort forwarding of log entries to a remote endpoint.
//!
//! [`LogExporter::export`] is synchronous and infallible: implementations hand
//! the entry to an independent unit of work and return immediately. Delivery is
//! at-most-once with no retry and no queue.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use tokio::runtime::Handle;
use tokio::sync::Notify;
use tracing::{debug, warn};

use crate::config::WebhookConfig;
use crate::error::{ExportError, RecorderError};
use crate::telemetry::events::LogEntry;

pub trait LogExporter: Send + Sync {
    /// Start delivery of `entry` without waiting for it. Must never panic or block.
    fn export(&self, entry: &LogEntry);
}

/// Exporter used when no webhook is configured. Performs no I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExporter;

impl LogExporter for NoopExporter {
    fn export(&self, _entry: &LogEntry) {}
}

/// POSTs each entry as JSON to a webhook on a detached tokio task.
#[derive(Debug, Clone)]
pub struct WebhookExporter {
    client: Client,
    url: Url,
    runtime: Option<Handle>,
    in_flight: Arc<InFlight>,
}

#[derive(Debug, Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

/// Decrements the in-flight count when a delivery task finishes, however it ends.
struct InFlightGuard(Arc<InFlight>);

impl InFlightGuard {
    fn acquire(in_flight: &Arc<InFlight>) -> Self {
        in_flight.count.fetch_add(1, Ordering::SeqCst);
        Self(in_flight.clone())
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }
}

impl WebhookExporter {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, RecorderError> {
        let url = Url::parse(url)
            .map_err(|e| RecorderError::ConfigError(format!("Invalid webhook URL '{}': {}", url, e)))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ExportError::from)?;
        Ok(Self {
            client,
            url,
            runtime: None,
            in_flight: Arc::new(InFlight::default()),
        })
    }

    /// `None` when the config has no URL, which disables export.
    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>, RecorderError> {
        match &config.url {
            Some(url) => Ok(Some(Self::new(
                url,
                Duration::from_millis(config.timeout_ms),
            )?)),
            None => Ok(None),
        }
    }

    /// Spawn deliveries on `handle` instead of the caller's ambient runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Deliveries started but not yet finished
    pub fn pending(&self) -> usize {
        self.in_flight.count.load(Ordering::SeqCst)
    }

    /// Wait up to `timeout` for outstanding deliveries. Returns `true` if none remain.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let in_flight = self.in_flight.clone();
        tokio::time::timeout(timeout, async move {
            loop {
                let idle = in_flight.idle.notified();
                if in_flight.count.load(Ordering::SeqCst) == 0 {
                    return;
                }
                idle.await;
            }
        })
        .await
        .is_ok()
    }

    /// Deliver one entry and report the outcome.
    pub async fn send(&self, entry: &LogEntry) -> Result<(), ExportError> {
        let payload = serde_json::to_vec(entry)?;
        post(&self.client, self.url.clone(), payload).await
    }

    fn runtime(&self) -> Option<Handle> {
        self.runtime.clone().or_else(|| Handle::try_current().ok())
    }
}

async fn post(client: &Client, url: Url, payload: Vec<u8>) -> Result<(), ExportError> {
    let response = client
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(payload)
        .send()
        .await?;
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ExportError::Status(status.as_u16()))
    }
}

impl LogExporter for WebhookExporter {
    fn export(&self, entry: &LogEntry) {
        let Some(runtime) = self.runtime() else {
            warn!(error = %ExportError::NoRuntime, "failed to send debug entry to monitoring");
            return;
        };
        let payload = match serde_json::to_vec(entry) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %ExportError::from(err), "failed to send debug entry to monitoring");
                return;
            }
        };

        let guard = InFlightGuard::acquire(&self.in_flight);
        let client = self.client.clone();
        let url = self.url.clone();
        runtime.spawn(async move {
            let _guard = guard;
            match post(&client, url, payload).await {
                Ok(()) => debug!("debug entry delivered to monitoring"),
                Err(err) => warn!(error = %err, "failed to send debug entry to monitoring"),
            }
        });
    }
}
