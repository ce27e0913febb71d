//! System configuration types: session persistence and logging.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the logged-in identity is persisted between runs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Session file path. Empty means `<data_dir>/tripdesk/session.json`.
    pub path: String,
}

impl SessionConfig {
    /// The configured path, if one was set.
    pub fn path_override(&self) -> Option<PathBuf> {
        let trimmed = self.path.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(PathBuf::from(trimmed))
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing` filter directive scoped to the tripdesk crates.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "tripdesk=trace",
            LogLevel::Debug => "tripdesk=debug",
            LogLevel::Info => "tripdesk=info",
            LogLevel::Warn => "tripdesk=warn",
            LogLevel::Error => "tripdesk=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_path_means_platform_default() {
        let config = SessionConfig::default();
        assert!(config.path_override().is_none());

        let config = SessionConfig {
            path: "   ".into(),
        };
        assert!(config.path_override().is_none());
    }

    #[test]
    fn session_path_override_is_trimmed() {
        let config = SessionConfig {
            path: " /tmp/tripdesk/session.json ".into(),
        };
        assert_eq!(
            config.path_override(),
            Some(PathBuf::from("/tmp/tripdesk/session.json"))
        );
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: LoggingConfig = toml::from_str("level = \"debug\"").unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.level.directive(), "tripdesk=debug");
    }
}
