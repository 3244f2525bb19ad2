//! Configuration System
//!
//! Layered recorder configuration: defaults, then an optional TOML file, then
//! `DEBUG_RECORDER_*` environment variables. Validation collects every problem
//! before failing.

use crate::error::RecorderError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

mod sources;

/// Default bound on the log buffer
pub const DEFAULT_MAX_LOGS: usize = 1000;

/// Default bound on the metric buffer
pub const DEFAULT_MAX_METRICS: usize = 500;

/// Default webhook request timeout
pub const DEFAULT_WEBHOOK_TIMEOUT_MS: u64 = 5000;

/// Runtime mode of the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    #[default]
    Production,
}

impl RuntimeMode {
    pub fn is_development(self) -> bool {
        self == RuntimeMode::Development
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Development mode mirrors every entry to the diagnostic log
    #[serde(default)]
    pub environment: RuntimeMode,

    /// Log buffer capacity
    #[serde(default = "default_max_logs")]
    pub max_logs: usize,

    /// Metric buffer capacity
    #[serde(default = "default_max_metrics")]
    pub max_metrics: usize,

    /// Remote export settings
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Webhook export settings; no URL disables export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default = "default_webhook_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_max_logs() -> usize {
    DEFAULT_MAX_LOGS
}

fn default_max_metrics() -> usize {
    DEFAULT_MAX_METRICS
}

fn default_webhook_timeout_ms() -> u64 {
    DEFAULT_WEBHOOK_TIMEOUT_MS
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: default_webhook_timeout_ms(),
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            environment: RuntimeMode::default(),
            max_logs: default_max_logs(),
            max_metrics: default_max_metrics(),
            webhook: WebhookConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Buffers(String),
    Webhook(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Buffers(msg) => write!(f, "Buffers: {}", msg),
            ValidationError::Webhook(msg) => write!(f, "Webhook: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl WebhookConfig {
    /// Validate webhook settings
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.url {
            let parsed =
                reqwest::Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(format!("URL '{}' must use http or https", url));
            }
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl RecorderConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.max_logs == 0 {
            errors.push(ValidationError::Buffers(
                "max_logs must be greater than zero".to_string(),
            ));
        }
        if self.max_metrics == 0 {
            errors.push(ValidationError::Buffers(
                "max_metrics must be greater than zero".to_string(),
            ));
        }
        if let Err(e) = self.webhook.validate() {
            errors.push(ValidationError::Webhook(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`RecorderConfig`] from its layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from defaults, an optional file and the process environment, then validate
    pub fn load(path: Option<&Path>) -> Result<RecorderConfig, RecorderError> {
        Self::load_with_env(path, None)
    }

    /// Like [`ConfigLoader::load`], but reads environment overrides from `env`
    /// instead of the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<RecorderConfig, RecorderError> {
        let config = Self::load_unvalidated_with_env(path, env)?;
        config.validate().map_err(validation_failed)?;
        Ok(config)
    }

    /// Layer the sources without validating, for callers that apply further
    /// overrides (CLI flags) and validate the result themselves.
    pub fn load_unvalidated(path: Option<&Path>) -> Result<RecorderConfig, RecorderError> {
        Self::load_unvalidated_with_env(path, None)
    }

    pub fn load_unvalidated_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<RecorderConfig, RecorderError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = sources::file::add_to_builder(builder, path)?;
        }
        builder = sources::environment::add_to_builder(builder, env);

        Ok(builder.build()?.try_deserialize()?)
    }
}

/// Fold validation errors into one [`RecorderError::ConfigError`]
pub fn validation_failed(errors: Vec<ValidationError>) -> RecorderError {
    let error_msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    RecorderError::ConfigError(format!(
        "Configuration validation failed:\n{}",
        error_msgs.join("\n")
    ))
}
