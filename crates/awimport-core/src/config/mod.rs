//! Configuration loading
//!
//! Settings come from three layers, lowest precedence first:
//! - awimport.toml (default location or `--config`)
//! - environment variables set by the host pipeline
//! - command-line flags

pub mod parser;
pub mod paths;
pub mod schema;

use std::path::Path;

pub use parser::{parse_config_toml, parse_config_toml_str};
pub use paths::{CONFIG_FILE_NAME, config_path_in, default_config_path};
pub use schema::{AirWatchConfig, ImporterConfig, MunkiConfig};

/// Load the config file layer.
///
/// An explicitly named file must exist. The default location is optional and
/// yields an empty configuration when absent.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<ImporterConfig> {
    match explicit {
        Some(path) => parse_config_toml(path),
        None => match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading default config");
                parse_config_toml(&path)
            }
            _ => Ok(ImporterConfig::new()),
        },
    }
}

/// Interpret a pipeline flag value such as `force_import`.
///
/// Empty, `0`, `false` and `no` are false; anything else is true.
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no"
    )
}
