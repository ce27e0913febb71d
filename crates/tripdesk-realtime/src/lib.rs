//! Realtime update client for the trip-booking feed.
//!
//! Keeps one WebSocket connection to the update endpoint, reconnects with a
//! fixed delay and a capped attempt count, decodes `{type, data}` envelopes
//! into typed events, and fans each event out to registered listeners.
//! The transport sits behind the [`Connector`] trait; [`WsConnector`] is the
//! `tokio-tungstenite` implementation.

mod client;
mod connection;
pub mod envelope;
mod error;
mod listeners;
mod policy;
mod transport;
mod types;

pub use client::{EventStream, RealtimeClient};
pub use envelope::{Envelope, Inbound};
pub use error::RealtimeError;
pub use listeners::{Handler, Subscription, SubscriptionGroup};
pub use policy::{ReconnectPolicy, DEFAULT_MAX_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_DELAY};
pub use transport::{Connector, Transport, WsConnector};
pub use types::{
    ClientConfig, ConnectionState, ConnectionStatus, EventName, RealtimeEvent, UnknownEventName,
    DEFAULT_REALTIME_URL,
};
