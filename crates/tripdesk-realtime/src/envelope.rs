//! `{type, data}` envelope codec and the inbound dispatch table.

use serde::{Deserialize, Serialize};

use crate::error::RealtimeError;
use crate::types::RealtimeEvent;

/// Wire tag for trip changes.
pub const TRIP_UPDATE: &str = "TRIP_UPDATE";
/// Wire tag for user changes.
pub const USER_UPDATE: &str = "USER_UPDATE";
/// Wire tag for reservation changes.
pub const RESERVATION_UPDATE: &str = "RESERVATION_UPDATE";

/// The wire wrapper shared by inbound and outbound messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    /// Missing `data` decodes as `null`.
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Serialize)]
struct OutboundEnvelope<'a, T: Serialize + ?Sized> {
    #[serde(rename = "type")]
    kind: &'a str,
    data: &'a T,
}

/// Result of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// A recognized tag, mapped to its typed event.
    Event(RealtimeEvent),
    /// A well-formed envelope with a tag outside the dispatch table.
    Unknown(String),
}

impl Envelope {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }

    /// Map the envelope through the dispatch table.
    pub fn into_inbound(self) -> Inbound {
        match self.kind.as_str() {
            TRIP_UPDATE => Inbound::Event(RealtimeEvent::TripUpdate(self.data)),
            USER_UPDATE => Inbound::Event(RealtimeEvent::UserUpdate(self.data)),
            RESERVATION_UPDATE => Inbound::Event(RealtimeEvent::ReservationUpdate(self.data)),
            _ => Inbound::Unknown(self.kind),
        }
    }
}

/// Parse a text frame into an [`Inbound`].
///
/// Anything that is not a JSON object with a string `type` is an error.
pub fn decode(raw: &str) -> Result<Inbound, RealtimeError> {
    let envelope: Envelope =
        serde_json::from_str(raw).map_err(|e| RealtimeError::Decode(e.to_string()))?;
    Ok(envelope.into_inbound())
}

/// Serialize an outbound `{type, data}` envelope.
pub fn encode<T: Serialize + ?Sized>(kind: &str, data: &T) -> Result<String, RealtimeError> {
    Ok(serde_json::to_string(&OutboundEnvelope { kind, data })?)
}
