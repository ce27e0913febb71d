//! Tripdesk configuration system.
//!
//! Provides TOML-based configuration with validation. All config sections
//! use sensible defaults so partial configs work out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tripdesk_config::{config_to_json, load_config};
//!
//! let config = load_config().expect("failed to load config");
//! let json = config_to_json(&config);
//! println!("{json}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod toml_writer;
pub mod validation;

pub use schema::{
    ApiConfig, LogLevel, LoggingConfig, RealtimeConfig, SessionConfig, TripdeskConfig,
    CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{load_default, load_from_path};
pub use toml_writer::{save_config, save_config_to_path};

use std::path::Path;

use tripdesk_common::ConfigError;

/// Load config from the platform default path.
///
/// Creates a default `config.toml` in the OS config directory if none
/// exists, then validates the result.
pub fn load_config() -> Result<TripdeskConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path, or the platform default when `None`.
///
/// Unlike [`load_from_path`], validation failures are returned as errors.
pub fn load_config_from(path: Option<&Path>) -> Result<TripdeskConfig, ConfigError> {
    match path {
        Some(path) => {
            let config = toml_loader::load_from_path(path)?;
            validation::validate(&config)?;
            Ok(config)
        }
        None => load_config(),
    }
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &TripdeskConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let config = TripdeskConfig::default();
        let json = config_to_json(&config);
        assert!(json.contains("\"realtime\""));
        assert!(json.contains("\"api\""));
        assert!(json.contains("\"session\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn default_config_round_trips_through_json() {
        let config = TripdeskConfig::default();
        let json = config_to_json(&config);
        let parsed: TripdeskConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.realtime.url, "ws://localhost:8080/ws");
        assert_eq!(parsed.realtime.reconnect_delay_ms, 3000);
        assert_eq!(parsed.api.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn load_config_from_explicit_path_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[realtime]
url = "http://not-a-websocket"
"#,
        )
        .unwrap();

        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("realtime.url"));
    }

    #[test]
    fn load_config_from_explicit_path_accepts_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[realtime]
max_reconnect_attempts = 2
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.realtime.max_reconnect_attempts, 2);
    }
}
