//! Session task: open the transport, pump frames, feed the retry policy.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{Inner, Outbound};
use crate::envelope::{self, Inbound};
use crate::error::RealtimeError;
use crate::transport::Transport;
use crate::types::{ConnectionState, ConnectionStatus, RealtimeEvent};

/// Spawn the session for `epoch`. The caller has already set `Connecting`.
pub(crate) fn spawn_session(inner: &Arc<Inner>, epoch: u64) {
    tokio::spawn(run_session(Arc::clone(inner), epoch));
}

async fn run_session(inner: Arc<Inner>, epoch: u64) {
    let url = inner.config.url.as_str();
    let timeout = inner.config.connect_timeout;
    info!(url = %url, id = %inner.id, epoch, "Connecting to realtime endpoint");

    let opened = match tokio::time::timeout(timeout, inner.connector.connect(url)).await {
        Ok(result) => result,
        Err(_) => Err(RealtimeError::Timeout(timeout)),
    };

    let mut transport = match opened {
        Ok(transport) => transport,
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to connect to realtime endpoint");
            on_error(&inner, epoch, &e);
            on_close(&inner, epoch);
            return;
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    if !on_open(&inner, epoch, tx) {
        debug!(epoch, "Connection superseded before open, closing");
        transport.close().await;
        return;
    }

    pump(&inner, epoch, transport.as_mut(), &mut rx).await;
    on_close(&inner, epoch);
}

/// Read frames in transport order and forward queued sends until either
/// side closes.
async fn pump(
    inner: &Inner,
    epoch: u64,
    transport: &mut dyn Transport,
    rx: &mut mpsc::UnboundedReceiver<Outbound>,
) {
    loop {
        tokio::select! {
            outbound = rx.recv() => match outbound {
                Some(Outbound::Text(text)) => {
                    if let Err(e) = transport.send_text(text).await {
                        warn!(error = %e, "Realtime send failed");
                        on_error(inner, epoch, &e);
                        break;
                    }
                }
                Some(Outbound::Close) | None => {
                    transport.close().await;
                    break;
                }
            },
            inbound = transport.next_text() => match inbound {
                Some(Ok(text)) => on_message(inner, epoch, &text),
                Some(Err(e)) => {
                    warn!(error = %e, "Realtime transport error");
                    on_error(inner, epoch, &e);
                    break;
                }
                None => {
                    info!("Realtime endpoint closed the connection");
                    break;
                }
            },
        }
    }
}

fn is_current(inner: &Inner, epoch: u64) -> bool {
    inner.link().epoch == epoch
}

fn on_open(inner: &Inner, epoch: u64, tx: mpsc::UnboundedSender<Outbound>) -> bool {
    {
        let mut link = inner.link();
        if link.epoch != epoch {
            return false;
        }
        link.state = ConnectionState::Connected;
        link.attempts = 0;
        link.outbound = Some(tx);
    }
    info!(id = %inner.id, "Connected to realtime endpoint");
    inner.emit(RealtimeEvent::Connection(ConnectionStatus::Connected));
    true
}

fn on_message(inner: &Inner, epoch: u64, raw: &str) {
    if !is_current(inner, epoch) {
        return;
    }
    match envelope::decode(raw) {
        Ok(Inbound::Event(event)) => {
            let delivered = inner.emit(event);
            debug!(delivered, "Dispatched realtime event");
        }
        Ok(Inbound::Unknown(kind)) => {
            warn!(kind = %kind, "Unknown realtime message type, dropped");
        }
        Err(e) => {
            warn!(error = %e, "Malformed realtime message, dropped");
        }
    }
}

/// Surface a transport failure. Reconnecting is left to `on_close`.
fn on_error(inner: &Inner, epoch: u64, err: &RealtimeError) {
    if is_current(inner, epoch) {
        inner.emit(RealtimeEvent::Error(err.to_string()));
    }
}

fn on_close(inner: &Arc<Inner>, epoch: u64) {
    let scheduled = {
        let mut link = inner.link();
        if link.epoch != epoch {
            return;
        }
        link.state = ConnectionState::Disconnected;
        link.outbound = None;
        let policy = inner.config.reconnect;
        match policy.next_delay(&mut link.attempts) {
            Some(delay) => {
                link.retry = Some(tokio::spawn(retry_after(Arc::clone(inner), epoch, delay)));
                Some((link.attempts, delay))
            }
            None => None,
        }
    };

    inner.emit(RealtimeEvent::Connection(ConnectionStatus::Disconnected));

    match scheduled {
        Some((attempt, delay)) => {
            info!(
                attempt,
                max_attempts = inner.config.reconnect.max_attempts,
                delay_ms = delay.as_millis() as u64,
                "Scheduling realtime reconnect"
            );
        }
        None => {
            warn!(
                max_attempts = inner.config.reconnect.max_attempts,
                "Realtime reconnect attempts exhausted, staying disconnected"
            );
            inner.emit(RealtimeEvent::Connection(ConnectionStatus::ReconnectExhausted));
        }
    }
}

async fn retry_after(inner: Arc<Inner>, epoch: u64, delay: Duration) {
    tokio::time::sleep(delay).await;
    {
        let mut link = inner.link();
        if link.epoch != epoch || link.state != ConnectionState::Disconnected {
            return;
        }
        link.retry = None;
        link.state = ConnectionState::Connecting;
    }
    spawn_session(&inner, epoch);
}
