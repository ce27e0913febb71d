//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = TripdeskConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_websocket_realtime_url() {
    let mut config = TripdeskConfig::default();
    config.realtime.url = "http://localhost:8080/ws".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.url"));
}

#[test]
fn accepts_secure_websocket_url() {
    let mut config = TripdeskConfig::default();
    config.realtime.url = "wss://trips.example.com/ws".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_reconnect_delay_too_small() {
    let mut config = TripdeskConfig::default();
    config.realtime.reconnect_delay_ms = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.reconnect_delay_ms"));
}

#[test]
fn catches_too_many_reconnect_attempts() {
    let mut config = TripdeskConfig::default();
    config.realtime.max_reconnect_attempts = 101;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.max_reconnect_attempts"));
}

#[test]
fn zero_reconnect_attempts_is_allowed() {
    let mut config = TripdeskConfig::default();
    config.realtime.max_reconnect_attempts = 0;
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_api_base_url_with_trailing_slash() {
    let mut config = TripdeskConfig::default();
    config.api.base_url = "http://localhost:8080/api/".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.base_url"));
}

#[test]
fn catches_zero_request_timeout() {
    let mut config = TripdeskConfig::default();
    config.api.request_timeout_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("api.request_timeout_secs"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = TripdeskConfig::default();
    config.realtime.url = "ftp://nope".into();
    config.api.connect_timeout_secs = 500;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("realtime.url"));
    assert!(err.contains("api.connect_timeout_secs"));
    assert!(err.contains("; "));
}
