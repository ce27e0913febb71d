//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Tripdesk Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[realtime]
# url = "ws://localhost:8080/ws"
# reconnect_delay_ms = 3000       # 10-600000, fixed delay between attempts
# max_reconnect_attempts = 5      # 0-100, retries since the last good connection
# connect_timeout_secs = 15       # 1-120
# announce_mutations = false      # send *_UPDATE after CLI mutations

[api]
# base_url = "http://localhost:8080/api"
# connect_timeout_secs = 10       # 1-120
# request_timeout_secs = 30       # 1-600

[session]
# path = ""                       # empty = <data dir>/tripdesk/session.json

[logging]
# level = "info"                  # trace, debug, info, warn, error
"##
    .to_string()
}
