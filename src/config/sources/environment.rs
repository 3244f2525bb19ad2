//! Environment variable source: `DEBUG_RECORDER_*`, with `__` separating nested keys.
//!
//! `DEBUG_RECORDER_ENVIRONMENT=development`, `DEBUG_RECORDER_MAX_LOGS=200`,
//! `DEBUG_RECORDER_WEBHOOK__URL=https://...`, `DEBUG_RECORDER_LOGGING__LEVEL=debug`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};
use std::collections::HashMap;

pub const ENV_PREFIX: &str = "DEBUG_RECORDER";

/// Add environment overrides. `env` replaces the process environment when given.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    env: Option<HashMap<String, String>>,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    )
}
