//! Transport seam between the client state machine and the socket.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::RealtimeError;

/// Opens transports to a URL.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, RealtimeError>;
}

/// One open, text-oriented, bidirectional connection.
#[async_trait]
pub trait Transport: Send {
    async fn send_text(&mut self, text: String) -> Result<(), RealtimeError>;

    /// Next inbound text frame. `None` means the peer closed the connection.
    async fn next_text(&mut self) -> Option<Result<String, RealtimeError>>;

    /// Best-effort close; errors are ignored.
    async fn close(&mut self);
}

/// [`Connector`] backed by `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>, RealtimeError> {
        let (stream, _) = tokio_tungstenite::connect_async(url)
            .await
            .map_err(|e| RealtimeError::WebSocket(e.to_string()))?;
        Ok(Box::new(WsTransport { stream }))
    }
}

struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send_text(&mut self, text: String) -> Result<(), RealtimeError> {
        self.stream
            .send(WsMessage::Text(text.into()))
            .await
            .map_err(|e| RealtimeError::WebSocket(e.to_string()))
    }

    async fn next_text(&mut self) -> Option<Result<String, RealtimeError>> {
        loop {
            match self.stream.next().await? {
                Ok(WsMessage::Text(text)) => return Some(Ok(text.to_string())),
                Ok(WsMessage::Close(frame)) => {
                    debug!(?frame, "server closed realtime connection");
                    return None;
                }
                // Ping/pong are answered by tungstenite; binary frames are not part of the feed.
                Ok(_) => continue,
                Err(e) => return Some(Err(RealtimeError::WebSocket(e.to_string()))),
            }
        }
    }

    async fn close(&mut self) {
        let _ = self.stream.close(None).await;
    }
}
