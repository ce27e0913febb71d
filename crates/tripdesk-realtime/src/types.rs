//! Configuration, connection state, and event types for the realtime client.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::policy::ReconnectPolicy;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_REALTIME_URL: &str = "ws://localhost:8080/ws";

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Settings for one [`RealtimeClient`](crate::RealtimeClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint, fixed for the lifetime of the client.
    pub url: String,
    /// When and how often to retry after a disconnect.
    pub reconnect: ReconnectPolicy,
    /// Upper bound on the transport handshake.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_REALTIME_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            connect_timeout: Duration::from_secs(15),
        }
    }
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

// ---------------------------------------------------------------------------
// Connection state
// ---------------------------------------------------------------------------

/// Lifecycle of the single logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Payload of the `connection` event: `{"status": "..."}` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    /// Emitted once when the retry budget runs out.
    ReconnectExhausted,
}

impl ConnectionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::ReconnectExhausted => "reconnect_exhausted",
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Names listeners subscribe under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    Connection,
    Error,
    TripUpdate,
    UserUpdate,
    ReservationUpdate,
}

impl EventName {
    pub const ALL: [EventName; 5] = [
        EventName::Connection,
        EventName::Error,
        EventName::TripUpdate,
        EventName::UserUpdate,
        EventName::ReservationUpdate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventName::Connection => "connection",
            EventName::Error => "error",
            EventName::TripUpdate => "tripUpdate",
            EventName::UserUpdate => "userUpdate",
            EventName::ReservationUpdate => "reservationUpdate",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing a string outside the event vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event name: {0}")]
pub struct UnknownEventName(pub String);

impl FromStr for EventName {
    type Err = UnknownEventName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownEventName(s.to_string()))
    }
}

/// Typed event delivered to listeners.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    /// Connection lifecycle change.
    Connection(ConnectionStatus),
    /// Transport or handshake failure, as text.
    Error(String),
    /// Something about a trip changed; `data` is passed through untouched.
    TripUpdate(serde_json::Value),
    UserUpdate(serde_json::Value),
    ReservationUpdate(serde_json::Value),
}

impl RealtimeEvent {
    pub fn name(&self) -> EventName {
        match self {
            RealtimeEvent::Connection(_) => EventName::Connection,
            RealtimeEvent::Error(_) => EventName::Error,
            RealtimeEvent::TripUpdate(_) => EventName::TripUpdate,
            RealtimeEvent::UserUpdate(_) => EventName::UserUpdate,
            RealtimeEvent::ReservationUpdate(_) => EventName::ReservationUpdate,
        }
    }

    /// The event payload as JSON: `{"status": ...}` for connection events,
    /// `{"message": ...}` for errors, and the raw `data` otherwise.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            RealtimeEvent::Connection(status) => serde_json::json!({ "status": status.as_str() }),
            RealtimeEvent::Error(message) => serde_json::json!({ "message": message }),
            RealtimeEvent::TripUpdate(data)
            | RealtimeEvent::UserUpdate(data)
            | RealtimeEvent::ReservationUpdate(data) => data.clone(),
        }
    }
}
