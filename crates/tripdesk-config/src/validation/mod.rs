//! Checks on a loaded config.
//!
//! Only `[realtime]` and `[api]` carry values that can be wrong: URL schemes,
//! timeouts and the retry cap. Every problem found is reported together in
//! one `ValidationError`.

mod helpers;
mod network;

#[cfg(test)]
mod tests;

use tripdesk_common::ConfigError;

use crate::schema::TripdeskConfig;

/// Check `[realtime]` and `[api]`, reporting every problem at once.
pub fn validate(config: &TripdeskConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    network::validate_realtime(&mut errors, config);
    network::validate_api(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
