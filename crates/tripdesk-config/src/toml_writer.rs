//! Persist a [`TripdeskConfig`] as TOML.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};
use tripdesk_common::ConfigError;

use crate::schema::TripdeskConfig;
use crate::toml_loader::default_config_path;

/// Save to the platform default path.
pub fn save_config(config: &TripdeskConfig) -> Result<(), ConfigError> {
    save_config_to_path(config, &default_config_path()?)
}

/// Save to `path`, creating parent directories as needed.
pub fn save_config_to_path(config: &TripdeskConfig, path: &Path) -> Result<(), ConfigError> {
    let body = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::ParseError(format!("cannot encode config as TOML: {e}")))?;
    write_staged(path, body.as_bytes())?;
    debug!(path = %path.display(), "Config saved");
    Ok(())
}

/// Write `bytes` to a sibling `.tmp` file and rename it over `path`, so a
/// crash never leaves a half-written config. Falls back to writing in place
/// when the platform refuses to rename over an existing file.
pub(crate) fn write_staged(path: &Path, bytes: &[u8]) -> Result<(), ConfigError> {
    let io_error =
        |what: &str, at: &Path, e: std::io::Error| ConfigError::ParseError(format!("{what} {}: {e}", at.display()));

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| io_error("cannot create", dir, e))?;
    }

    let staged = path.with_extension("toml.tmp");
    fs::write(&staged, bytes).map_err(|e| io_error("cannot write", &staged, e))?;

    if let Err(e) = fs::rename(&staged, path) {
        warn!(path = %path.display(), error = %e, "Rename refused, writing config in place");
        let direct = fs::write(path, bytes);
        let _ = fs::remove_file(&staged);
        direct.map_err(|e| io_error("cannot write", path, e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogLevel;

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = TripdeskConfig::default();
        config.realtime.url = "wss://trips.example.com/ws".into();
        config.realtime.announce_mutations = true;
        config.logging.level = LogLevel::Debug;
        save_config_to_path(&config, &path).unwrap();

        let parsed = crate::load_from_path(&path).unwrap();
        assert_eq!(parsed.realtime.url, "wss://trips.example.com/ws");
        assert!(parsed.realtime.announce_mutations);
        assert_eq!(parsed.logging.level, LogLevel::Debug);
        assert_eq!(parsed.api.base_url, config.api.base_url);
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("config.toml");

        save_config_to_path(&TripdeskConfig::default(), &path).unwrap();
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("ws://localhost:8080/ws"));
    }

    #[test]
    fn staged_file_does_not_linger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        write_staged(&path, b"[api]\n").unwrap();
        write_staged(&path, b"[realtime]\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "[realtime]\n");
        assert!(!path.with_extension("toml.tmp").exists());
    }
}
