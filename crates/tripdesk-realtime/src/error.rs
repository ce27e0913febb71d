use std::time::Duration;

/// Errors surfaced by the realtime client and its transports.
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    /// `send` was called while the connection was not open.
    #[error("realtime connection is not open")]
    NotConnected,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("websocket error: {0}")]
    WebSocket(String),

    /// An inbound frame was not a valid `{type, data}` envelope.
    #[error("malformed envelope: {0}")]
    Decode(String),

    #[error("connection timed out after {0:?}")]
    Timeout(Duration),
}

impl From<RealtimeError> for tripdesk_common::TripdeskError {
    fn from(err: RealtimeError) -> Self {
        tripdesk_common::TripdeskError::Realtime(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            RealtimeError::NotConnected.to_string(),
            "realtime connection is not open"
        );
        assert_eq!(
            RealtimeError::WebSocket("reset by peer".into()).to_string(),
            "websocket error: reset by peer"
        );
        assert_eq!(
            RealtimeError::Timeout(Duration::from_secs(15)).to_string(),
            "connection timed out after 15s"
        );
    }

    #[test]
    fn converts_into_tripdesk_error() {
        let err: tripdesk_common::TripdeskError = RealtimeError::NotConnected.into();
        assert!(matches!(err, tripdesk_common::TripdeskError::Realtime(_)));
        assert_eq!(err.to_string(), "realtime error: realtime connection is not open");
    }
}
