//! Debug Recorder CLI Binary
//!
//! Replays JSON-lines events into a recorder built from configuration and
//! prints the report, error summary, recent logs, or recent metrics.

use clap::Parser;
use debug_recorder::cli::{map_error, Cli, RunContext};
use debug_recorder::config::{validation_failed, ConfigLoader, RecorderConfig, RuntimeMode};
use debug_recorder::error::RecorderError;
use debug_recorder::logging::init_logging;
use debug_recorder::telemetry::install_panic_capture;
use std::process;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Debug recorder starting");

    let context = match RunContext::new(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing recorder: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };
    install_panic_capture(context.recorder());

    let result = context.execute(&cli.command);
    context.shutdown().await;

    match result {
        Ok(output) => {
            info!("Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build configuration from the config file and environment, then apply CLI flags.
/// Precedence: CLI flags override environment override config file override defaults.
fn build_config(cli: &Cli) -> Result<RecorderConfig, RecorderError> {
    let mut config = ConfigLoader::load_unvalidated(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, cli);
    config.validate().map_err(validation_failed)?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut RecorderConfig, cli: &Cli) {
    if cli.development {
        config.environment = RuntimeMode::Development;
    }
    if let Some(ref url) = cli.webhook {
        config.webhook.url = Some(url.clone());
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = format.clone();
    }
    if cli.quiet {
        config.logging.enabled = false;
    }
}
