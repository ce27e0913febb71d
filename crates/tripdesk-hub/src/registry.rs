//! Registry of open hub connections, keyed by connection id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};
use tripdesk_common::ConnectionId;

/// Thread-safe map of connection id to that connection's outbound channel.
#[derive(Clone, Default)]
pub struct HubRegistry {
    peers: Arc<RwLock<HashMap<ConnectionId, mpsc::Sender<String>>>>,
}

impl HubRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, id: ConnectionId, tx: mpsc::Sender<String>) {
        self.peers.write().await.insert(id, tx);
    }

    /// Returns true if the id was registered.
    pub async fn unregister(&self, id: &ConnectionId) -> bool {
        self.peers.write().await.remove(id).is_some()
    }

    pub async fn count(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Queue `text` for every connection except `from`. Returns how many
    /// connections accepted it.
    ///
    /// Never waits on a peer: a connection whose queue is full misses this
    /// message.
    pub async fn broadcast(&self, from: &ConnectionId, text: &str) -> usize {
        let map = self.peers.read().await;
        let mut delivered = 0;
        for (id, tx) in map.iter().filter(|(id, _)| *id != from) {
            match tx.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(peer = %id, "Peer queue full, message dropped");
                }
                // Receiver gone; its handler unregisters on the way out.
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(peer = %id, "Peer channel closed");
                }
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn broadcast_skips_sender() {
        let registry = HubRegistry::new();
        let (a, b, c) = (ConnectionId::new(), ConnectionId::new(), ConnectionId::new());
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        let (tx_c, mut rx_c) = mpsc::channel(8);
        registry.register(a.clone(), tx_a).await;
        registry.register(b, tx_b).await;
        registry.register(c, tx_c).await;

        assert_eq!(registry.broadcast(&a, "hello").await, 2);
        assert_eq!(rx_b.recv().await.as_deref(), Some("hello"));
        assert_eq!(rx_c.recv().await.as_deref(), Some("hello"));
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn unregister_removes_peer() {
        let registry = HubRegistry::new();
        let id = ConnectionId::new();
        let (tx, _rx) = mpsc::channel(8);
        registry.register(id.clone(), tx).await;
        assert_eq!(registry.count().await, 1);

        assert!(registry.unregister(&id).await);
        assert!(!registry.unregister(&id).await);
        assert_eq!(registry.count().await, 0);
    }

    #[tokio::test]
    async fn full_queue_skips_only_that_peer() {
        let registry = HubRegistry::new();
        let from = ConnectionId::new();
        let (stuck_tx, mut stuck_rx) = mpsc::channel(1);
        let (live_tx, mut live_rx) = mpsc::channel(8);
        registry.register(ConnectionId::new(), stuck_tx).await;
        registry.register(ConnectionId::new(), live_tx).await;

        assert_eq!(registry.broadcast(&from, "one").await, 2);
        assert_eq!(registry.broadcast(&from, "two").await, 1);
        assert_eq!(live_rx.recv().await.as_deref(), Some("one"));
        assert_eq!(live_rx.recv().await.as_deref(), Some("two"));
        assert_eq!(stuck_rx.recv().await.as_deref(), Some("one"));
        assert!(stuck_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn closed_receivers_are_not_counted() {
        let registry = HubRegistry::new();
        let from = ConnectionId::new();
        let (tx, rx) = mpsc::channel(8);
        registry.register(ConnectionId::new(), tx).await;
        drop(rx);
        assert_eq!(registry.broadcast(&from, "x").await, 0);
    }
}
