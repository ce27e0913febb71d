//! Validation for the realtime and api sections.

use crate::schema::TripdeskConfig;

use super::helpers::{validate_range, validate_scheme};

/// Validate realtime feed constraints.
pub(crate) fn validate_realtime(errors: &mut Vec<String>, config: &TripdeskConfig) {
    let rt = &config.realtime;
    validate_scheme(errors, "realtime.url", &rt.url, &["ws://", "wss://"]);
    validate_range(
        errors,
        "realtime.reconnect_delay_ms",
        rt.reconnect_delay_ms,
        10,
        600_000,
    );
    validate_range(
        errors,
        "realtime.max_reconnect_attempts",
        rt.max_reconnect_attempts,
        0,
        100,
    );
    validate_range(
        errors,
        "realtime.connect_timeout_secs",
        rt.connect_timeout_secs,
        1,
        120,
    );
}

/// Validate REST API constraints.
pub(crate) fn validate_api(errors: &mut Vec<String>, config: &TripdeskConfig) {
    let api = &config.api;
    validate_scheme(errors, "api.base_url", &api.base_url, &["http://", "https://"]);
    if api.base_url.ends_with('/') {
        errors.push(format!(
            "api.base_url = {:?} must not end with '/'",
            api.base_url
        ));
    }
    validate_range(
        errors,
        "api.connect_timeout_secs",
        api.connect_timeout_secs,
        1,
        120,
    );
    validate_range(
        errors,
        "api.request_timeout_secs",
        api.request_timeout_secs,
        1,
        600,
    );
}
