//! Per-connection handler: register, then rebroadcast envelopes to everyone else.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tripdesk_common::ConnectionId;
use tripdesk_realtime::Envelope;

use crate::registry::HubRegistry;

/// Outbound frames buffered per connection before broadcasts start skipping it.
const PEER_QUEUE: usize = 256;

/// Handle a single WebSocket connection until either side closes it.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    registry: HubRegistry,
) {
    let (mut sink, mut stream) = ws.split();
    let id = ConnectionId::new();

    let (tx, mut rx) = mpsc::channel::<String>(PEER_QUEUE);
    registry.register(id.clone(), tx).await;
    tracing::info!(peer = %addr, id = %id, "Client connected");

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                if sink.send(Message::Text(msg.into())).await.is_err() {
                    break;
                }
            }

            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => match normalize(&text) {
                        Some(envelope) => {
                            let delivered = registry.broadcast(&id, &envelope).await;
                            tracing::debug!(id = %id, delivered, "Broadcast envelope");
                        }
                        None => {
                            tracing::warn!(id = %id, "Dropped frame that is not a {{type, data}} envelope");
                        }
                    },
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    registry.unregister(&id).await;
    tracing::info!(peer = %addr, id = %id, "Client disconnected");
}

/// Parse a frame as an envelope and re-serialize it as `{type, data}`.
pub(crate) fn normalize(text: &str) -> Option<String> {
    let envelope: Envelope = serde_json::from_str(text).ok()?;
    serde_json::to_string(&envelope).ok()
}
