//! CLI route: run context built from configuration, and the command table.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::ingest::{ingest, IngestStats};
use crate::cli::parse::Commands;
use crate::config::RecorderConfig;
use crate::error::RecorderError;
use crate::telemetry::{RecorderBuilder, TelemetryRecorder, WebhookExporter};

/// Runtime context for CLI execution: the recorder and its optional webhook exporter.
pub struct RunContext {
    recorder: Arc<TelemetryRecorder>,
    exporter: Option<WebhookExporter>,
    drain_timeout: Duration,
}

impl RunContext {
    pub fn new(config: &RecorderConfig) -> Result<Self, RecorderError> {
        let exporter = WebhookExporter::from_config(&config.webhook)?;
        let mut builder = RecorderBuilder::from_config(config);
        if let Some(exporter) = &exporter {
            info!(url = %exporter.url(), "webhook export enabled");
            builder = builder.exporter(Arc::new(exporter.clone()));
        }
        Ok(Self {
            recorder: Arc::new(builder.build()),
            exporter,
            drain_timeout: Duration::from_millis(config.webhook.timeout_ms),
        })
    }

    pub fn recorder(&self) -> Arc<TelemetryRecorder> {
        Arc::clone(&self.recorder)
    }

    /// Ingest the command's input, then render its output.
    pub fn execute(&self, command: &Commands) -> Result<String, RecorderError> {
        let stats = self.ingest_input(command.input().map(|p| p.as_path()))?;
        debug!(
            command = command.name(),
            logs = stats.logs,
            metrics = stats.metrics,
            skipped = stats.skipped,
            "input ingested"
        );
        self.render(command)
    }

    /// Render a command's output from the recorder's current state.
    pub fn render(&self, command: &Commands) -> Result<String, RecorderError> {
        let output = match command {
            Commands::Report { .. } => self.recorder.report(),
            Commands::Summary { .. } => serde_json::to_string_pretty(&self.recorder.error_summary())?,
            Commands::Logs { limit, .. } => {
                serde_json::to_string_pretty(&self.recorder.recent_logs(*limit))?
            }
            Commands::Metrics { limit, .. } => {
                serde_json::to_string_pretty(&self.recorder.recent_metrics(*limit))?
            }
        };
        Ok(output)
    }

    /// Give outstanding webhook deliveries up to the configured timeout.
    pub async fn shutdown(&self) {
        if let Some(exporter) = &self.exporter {
            let pending = exporter.pending();
            if !exporter.drain(self.drain_timeout).await {
                info!(pending = exporter.pending(), "abandoning undelivered debug entries");
            } else if pending > 0 {
                debug!(delivered = pending, "webhook deliveries drained");
            }
        }
    }

    fn ingest_input(&self, input: Option<&Path>) -> Result<IngestStats, RecorderError> {
        match input {
            Some(path) => {
                let file = File::open(path)?;
                ingest(BufReader::new(file), &self.recorder)
            }
            None => ingest(io::stdin().lock(), &self.recorder),
        }
    }
}
