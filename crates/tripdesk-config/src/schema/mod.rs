//! Configuration schema types for Tripdesk.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that match the stock backend
//! running on `localhost:8080`.

mod api;
mod realtime;
mod system;

pub use api::*;
pub use realtime::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Tripdesk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct TripdeskConfig {
    pub realtime: RealtimeConfig,
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_realtime() {
        let config = TripdeskConfig::default();
        assert_eq!(config.realtime.url, "ws://localhost:8080/ws");
        assert_eq!(config.realtime.reconnect_delay_ms, 3000);
        assert_eq!(config.realtime.max_reconnect_attempts, 5);
        assert_eq!(config.realtime.connect_timeout_secs, 15);
        assert!(!config.realtime.announce_mutations);
    }

    #[test]
    fn default_config_has_correct_api() {
        let config = TripdeskConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.connect_timeout_secs, 10);
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn default_config_has_correct_session_and_logging() {
        let config = TripdeskConfig::default();
        assert!(config.session.path.is_empty());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: TripdeskConfig = toml::from_str(
            r#"
[realtime]
reconnect_delay_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.realtime.reconnect_delay_ms, 500);
        assert_eq!(config.realtime.max_reconnect_attempts, 5);
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn empty_toml_is_default() {
        let config: TripdeskConfig = toml::from_str("").unwrap();
        assert_eq!(config.realtime.url, "ws://localhost:8080/ws");
        assert_eq!(config.logging.level, LogLevel::Info);
    }
}
