//! Realtime update feed configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection and reconnect settings for the realtime feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RealtimeConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub url: String,
    /// Fixed delay between reconnect attempts in milliseconds (valid range: 10-600000).
    pub reconnect_delay_ms: u32,
    /// Retries allowed since the last successful connection (valid range: 0-100).
    pub max_reconnect_attempts: u32,
    /// Handshake timeout in seconds (valid range: 1-120).
    pub connect_timeout_secs: u32,
    /// Send a `*_UPDATE` envelope after a successful mutation made from the CLI.
    pub announce_mutations: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/ws".into(),
            reconnect_delay_ms: 3000,
            max_reconnect_attempts: 5,
            connect_timeout_secs: 15,
            announce_mutations: false,
        }
    }
}

impl RealtimeConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.reconnect_delay_ms))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.connect_timeout_secs))
    }
}
