//! Individual WebSocket connection
//!
//! Represents a single display board attached to the gateway.

use board_common::protocol::GatewayMessage;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// A single WebSocket connection
pub struct Connection {
    /// Unique connection ID
    id: String,

    /// Channel to the socket writer
    sender: mpsc::Sender<GatewayMessage>,

    /// Last dispatch sequence number sent
    sequence: AtomicU64,

    /// Last heartbeat received (connection time until the first one)
    last_heartbeat: Mutex<Instant>,

    created_at: Instant,
}

impl Connection {
    /// Create a new connection
    pub fn new(id: String, sender: mpsc::Sender<GatewayMessage>) -> Arc<Self> {
        let now = Instant::now();
        Arc::new(Self {
            id,
            sender,
            sequence: AtomicU64::new(0),
            last_heartbeat: Mutex::new(now),
            created_at: now,
        })
    }

    /// Generate a new connection ID
    #[must_use]
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the next sequence number
    pub fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Get the current sequence number
    pub fn current_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    /// Record a heartbeat received
    pub fn record_heartbeat(&self) {
        *self.last_heartbeat.lock() = Instant::now();
    }

    /// Get time since last heartbeat
    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.lock().elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Queue a Dispatch for this connection, stamping the next sequence number
    ///
    /// The sequence only advances when the message was actually queued, so a
    /// board never sees a gap for a frame it was not sent.
    pub fn try_dispatch(&self, event_type: &str, data: &Value) -> Result<u64, TrySendError<()>> {
        let permit = self.sender.try_reserve()?;
        let seq = self.next_sequence();
        permit.send(GatewayMessage::dispatch(event_type, seq, data.clone()));
        Ok(seq)
    }

    /// Try to send a message (non-blocking)
    pub fn try_send(&self, message: GatewayMessage) -> Result<(), TrySendError<GatewayMessage>> {
        self.sender.try_send(message)
    }

    /// Check if the writer side has gone away
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("sequence", &self.sequence.load(Ordering::SeqCst))
            .field("created_at", &self.created_at)
            .finish()
    }
}
