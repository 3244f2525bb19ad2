//! Integration tests for the debug recorder

mod cli_binary;
mod recorder_scenarios;
mod webhook_export;
