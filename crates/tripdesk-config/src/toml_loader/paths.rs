//! Where the config file lives, and seeding it on first run.

use std::path::{Path, PathBuf};

use tracing::info;
use tripdesk_common::ConfigError;

use super::template::default_config_toml;
use crate::toml_writer::write_staged;

/// `<config_dir>/tripdesk/config.toml` for the current platform.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("tripdesk").join("config.toml"))
        .ok_or_else(|| ConfigError::ParseError("no config directory on this platform".into()))
}

/// Write the commented template to `path`.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    write_staged(path, default_config_toml().as_bytes())?;
    info!(path = %path.display(), "Wrote default config");
    Ok(())
}
