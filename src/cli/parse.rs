//! CLI parse: clap types for the debug recorder. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::telemetry::DEFAULT_RECENT_LIMIT;

/// Debug recorder CLI - replay JSON-lines events and inspect the result
#[derive(Debug, Parser)]
#[command(name = "debug-recorder")]
#[command(about = "Bounded debug log and performance metric recorder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mirror every recorded entry to the diagnostic log
    #[arg(long, global = true)]
    pub development: bool,

    /// Webhook URL receiving each log entry (overrides config)
    #[arg(long, global = true)]
    pub webhook: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Disable diagnostic logging entirely
    #[arg(long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the text debug report
    Report {
        /// JSON-lines input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the error summary as JSON
    Summary {
        /// JSON-lines input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Print the most recent log entries as JSON
    Logs {
        /// JSON-lines input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Number of entries; non-positive values print nothing
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT, allow_negative_numbers = true)]
        limit: i64,
    },
    /// Print the most recent performance metrics as JSON
    Metrics {
        /// JSON-lines input file (default: stdin)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Number of metrics; non-positive values print nothing
        #[arg(long, default_value_t = DEFAULT_RECENT_LIMIT, allow_negative_numbers = true)]
        limit: i64,
    },
}

impl Commands {
    pub fn input(&self) -> Option<&PathBuf> {
        match self {
            Commands::Report { input }
            | Commands::Summary { input }
            | Commands::Logs { input, .. }
            | Commands::Metrics { input, .. } => input.as_ref(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Commands::Report { .. } => "report",
            Commands::Summary { .. } => "summary",
            Commands::Logs { .. } => "logs",
            Commands::Metrics { .. } => "metrics",
        }
    }
}
