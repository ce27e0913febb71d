//! Public handle for the realtime client.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use tripdesk_common::ConnectionId;

use crate::connection;
use crate::envelope;
use crate::error::RealtimeError;
use crate::listeners::{Handler, ListenerRegistry, Subscription, SubscriptionGroup};
use crate::transport::{Connector, WsConnector};
use crate::types::{ClientConfig, ConnectionState, ConnectionStatus, EventName, RealtimeEvent};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Messages from the handle to the session task that owns the socket.
#[derive(Debug)]
pub(crate) enum Outbound {
    Text(String),
    Close,
}

/// Mutable connection bookkeeping, guarded by one short critical section.
pub(crate) struct LinkState {
    pub(crate) state: ConnectionState,
    pub(crate) attempts: u32,
    /// Bumped by every explicit `connect()`/`disconnect()`. Tasks carrying an
    /// older value are inert.
    pub(crate) epoch: u64,
    pub(crate) outbound: Option<mpsc::UnboundedSender<Outbound>>,
    pub(crate) retry: Option<JoinHandle<()>>,
}

pub(crate) struct Inner {
    pub(crate) config: ClientConfig,
    pub(crate) connector: Arc<dyn Connector>,
    pub(crate) listeners: ListenerRegistry,
    pub(crate) id: ConnectionId,
    link: Mutex<LinkState>,
}

impl Inner {
    /// Never hold the guard across an `.await` or while emitting.
    pub(crate) fn link(&self) -> MutexGuard<'_, LinkState> {
        self.link.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn emit(&self, event: RealtimeEvent) -> usize {
        self.listeners.emit(&event)
    }

    /// Cancel any retry, invalidate running tasks and ask the live session to
    /// close. Returns whether a connection was open.
    fn shut_down(&self) -> bool {
        let mut link = self.link();
        if let Some(retry) = link.retry.take() {
            retry.abort();
        }
        link.epoch += 1;
        if let Some(outbound) = link.outbound.take() {
            let _ = outbound.send(Outbound::Close);
        }
        let was_connected = link.state == ConnectionState::Connected;
        link.state = ConnectionState::Disconnected;
        was_connected
    }
}

/// Shared by every clone of a handle. Session and retry tasks hold `Inner`
/// directly, so the connection is torn down here once the last handle goes.
struct HandleGuard(Arc<Inner>);

impl Drop for HandleGuard {
    fn drop(&mut self) {
        if self.0.shut_down() {
            debug!(id = %self.0.id, "Last realtime handle dropped, connection closed");
        }
    }
}

// ---------------------------------------------------------------------------
// RealtimeClient
// ---------------------------------------------------------------------------

/// Handle to one logical realtime connection.
///
/// Cloning is cheap and every clone drives the same connection. `connect`
/// and `disconnect` never block; socket work happens on spawned tokio tasks,
/// so they must be called from within a runtime. Dropping the last clone
/// closes the connection the same way `disconnect` does, without emitting.
#[derive(Clone)]
pub struct RealtimeClient {
    inner: Arc<Inner>,
    _guard: Arc<HandleGuard>,
}

impl RealtimeClient {
    /// Client over the default `tokio-tungstenite` transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_connector(config, WsConnector)
    }

    pub fn with_connector(config: ClientConfig, connector: impl Connector) -> Self {
        let inner = Arc::new(Inner {
            config,
            connector: Arc::new(connector),
            listeners: ListenerRegistry::new(),
            id: ConnectionId::new(),
            link: Mutex::new(LinkState {
                state: ConnectionState::Disconnected,
                attempts: 0,
                epoch: 0,
                outbound: None,
                retry: None,
            }),
        });
        Self {
            _guard: Arc::new(HandleGuard(Arc::clone(&inner))),
            inner,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.link().state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Reconnect attempts used since the last successful open.
    pub fn reconnect_attempts(&self) -> u32 {
        self.inner.link().attempts
    }

    /// Start connecting if nothing is live.
    ///
    /// Does nothing while `Connecting` or `Connected`. Otherwise cancels any
    /// scheduled retry and restores the full retry budget before opening.
    pub fn connect(&self) {
        let epoch = {
            let mut link = self.inner.link();
            if link.state != ConnectionState::Disconnected {
                debug!(state = ?link.state, "connect() ignored, connection already live");
                return;
            }
            if let Some(retry) = link.retry.take() {
                retry.abort();
            }
            link.attempts = 0;
            link.epoch += 1;
            link.state = ConnectionState::Connecting;
            link.epoch
        };
        connection::spawn_session(&self.inner, epoch);
    }

    /// Close the live connection and cancel any scheduled retry.
    ///
    /// The close that follows does not schedule a reconnect. Emits
    /// `connection {status: "disconnected"}` if a connection was open.
    pub fn disconnect(&self) {
        let was_connected = self.inner.shut_down();
        info!(id = %self.inner.id, "Realtime client disconnected");
        if was_connected {
            self.inner
                .emit(RealtimeEvent::Connection(ConnectionStatus::Disconnected));
        }
    }

    /// Queue a `{type, data}` envelope for the socket.
    ///
    /// Only transmits while `Connected`. In any other state nothing is written,
    /// the drop is logged, and `RealtimeError::NotConnected` is returned.
    pub fn send<T: Serialize + ?Sized>(&self, kind: &str, data: &T) -> Result<(), RealtimeError> {
        let outbound = {
            let link = self.inner.link();
            match (&link.state, &link.outbound) {
                (ConnectionState::Connected, Some(tx)) => Some(tx.clone()),
                _ => None,
            }
        };
        let Some(outbound) = outbound else {
            error!(kind, "Realtime connection is not open, message dropped");
            return Err(RealtimeError::NotConnected);
        };
        let text = envelope::encode(kind, data).inspect_err(|e| {
            error!(kind, error = %e, "Failed to encode outbound envelope");
        })?;
        outbound.send(Outbound::Text(text)).map_err(|_| {
            error!(kind, "Realtime session ended, message dropped");
            RealtimeError::NotConnected
        })
    }

    /// Register `handler` for `event`.
    pub fn subscribe<F>(&self, event: EventName, handler: F) -> Subscription
    where
        F: Fn(&RealtimeEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.add(event, Arc::new(handler))
    }

    /// Register a batch of handlers, released together by the returned group.
    pub fn subscribe_all<I>(&self, handlers: I) -> SubscriptionGroup
    where
        I: IntoIterator<Item = (EventName, Handler)>,
    {
        SubscriptionGroup::new(
            handlers
                .into_iter()
                .map(|(event, handler)| self.inner.listeners.add(event, handler))
                .collect(),
        )
    }

    /// Number of handlers currently registered for `event`.
    pub fn listener_count(&self, event: EventName) -> usize {
        self.inner.listeners.count(event)
    }

    /// Receive the given events through a channel instead of callbacks.
    ///
    /// The subscriptions are released when the stream is dropped.
    pub fn event_stream(&self, events: &[EventName]) -> EventStream {
        let (tx, rx) = mpsc::unbounded_channel();
        let group = self.subscribe_all(events.iter().map(|&event| {
            let tx = tx.clone();
            let handler: Handler = Arc::new(move |ev: &RealtimeEvent| {
                let _ = tx.send(ev.clone());
            });
            (event, handler)
        }));
        EventStream { rx, group }
    }
}

impl fmt::Debug for RealtimeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RealtimeClient")
            .field("id", &self.inner.id)
            .field("url", &self.inner.config.url)
            .field("state", &self.state())
            .finish()
    }
}

/// Channel-backed view of a set of events; see [`RealtimeClient::event_stream`].
#[derive(Debug)]
pub struct EventStream {
    rx: mpsc::UnboundedReceiver<RealtimeEvent>,
    group: SubscriptionGroup,
}

impl EventStream {
    /// Next event, in dispatch order.
    pub async fn recv(&mut self) -> Option<RealtimeEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventStream {
    fn drop(&mut self) {
        self.group.unsubscribe_all();
    }
}
