//! Connection manager
//!
//! Tracks all live board connections using DashMap for thread-safe access.

use super::Connection;
use board_common::protocol::GatewayMessage;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Manages all active WebSocket connections
pub struct ConnectionManager {
    /// Active connections by connection ID
    connections: DashMap<String, Arc<Connection>>,
}

impl ConnectionManager {
    /// Create a new connection manager
    #[must_use]
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Create a new connection manager wrapped in Arc
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a new connection under a fresh ID
    pub fn add_connection(&self, sender: mpsc::Sender<GatewayMessage>) -> Arc<Connection> {
        let id = Connection::generate_id();
        let connection = Connection::new(id.clone(), sender);
        self.connections.insert(id.clone(), connection.clone());

        tracing::debug!(connection_id = %id, "Connection added");

        connection
    }

    /// Remove a connection
    pub fn remove_connection(&self, id: &str) -> Option<Arc<Connection>> {
        let removed = self.connections.remove(id).map(|(_, c)| c);
        if removed.is_some() {
            tracing::debug!(connection_id = %id, "Connection removed");
        }
        removed
    }

    /// Snapshot of current connections; no map shard stays locked afterwards
    fn snapshot(&self) -> Vec<Arc<Connection>> {
        self.connections.iter().map(|r| r.value().clone()).collect()
    }

    /// Dispatch an event to every connection
    ///
    /// Each connection stamps its own sequence number. A board whose outgoing
    /// queue is full misses the event rather than stalling the others. Entries
    /// whose writer is gone are pruned.
    pub fn dispatch_all(&self, event_type: &str, data: &Value) -> usize {
        let mut sent = 0;
        let mut closed = 0;

        for conn in self.snapshot() {
            match conn.try_dispatch(event_type, data) {
                Ok(_) => sent += 1,
                Err(TrySendError::Full(())) => {
                    tracing::warn!(
                        connection_id = %conn.id(),
                        event_type = %event_type,
                        "Outgoing queue full, dropping event"
                    );
                }
                Err(TrySendError::Closed(())) => closed += 1,
            }
        }

        if closed > 0 {
            self.cleanup_closed_connections();
        }

        tracing::trace!(event_type = %event_type, sent = sent, "Event dispatched");

        sent
    }

    /// Broadcast a non-dispatch message to all connections
    pub fn broadcast(&self, message: &GatewayMessage) -> usize {
        let sent = self
            .snapshot()
            .into_iter()
            .filter(|conn| conn.try_send(message.clone()).is_ok())
            .count();

        tracing::debug!(sent = sent, op = %message.op, "Message broadcast to all connections");

        sent
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Check if a connection exists
    pub fn has_connection(&self, id: &str) -> bool {
        self.connections.contains_key(id)
    }

    /// Drop entries whose writer has already gone away
    fn cleanup_closed_connections(&self) -> usize {
        let before = self.connections.len();
        self.connections.retain(|_, conn| !conn.is_closed());
        let count = before.saturating_sub(self.connections.len());

        if count > 0 {
            tracing::info!(count = count, "Cleaned up closed connections");
        }

        count
    }

    /// Wait until every connection has deregistered, or `timeout` elapses
    ///
    /// Returns the number of connections still open.
    pub async fn drain(&self, timeout: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + timeout;
        while self.connection_count() > 0 && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        self.connection_count()
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("connections", &self.connections.len())
            .finish()
    }
}
