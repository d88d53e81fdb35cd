//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "awimport.toml";

/// Location of the config file inside a config directory.
pub fn config_path_in(config_dir: &Path) -> PathBuf {
    config_dir.join("awimport").join(CONFIG_FILE_NAME)
}

/// Default config file location, e.g. `~/.config/awimport/awimport.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| config_path_in(&dir))
}
