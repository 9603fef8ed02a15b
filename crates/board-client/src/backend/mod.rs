//! Backend collaborator used by the form and the board
//!
//! Three operations: insert a record, read the most recent ones, and
//! subscribe to records inserted from now on.

mod backoff;
mod gateway;
mod http;
mod memory;
mod subscription;

pub use backoff::Backoff;
pub use http::HttpBackend;
pub use memory::MemoryBackend;
pub use subscription::{Subscription, SubscriptionHandle, SubscriptionSink};

use async_trait::async_trait;
use board_core::{Feedback, Snowflake};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// A record as submitted, before the backend assigns its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFeedback {
    pub name: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Errors talking to the backend
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error body
    #[error("{code} ({status}): {message}")]
    Rejected {
        status: u16,
        code: String,
        message: String,
    },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("Failed to decode gateway frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid backend configuration: {0}")]
    Config(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

#[async_trait]
pub trait FeedbackBackend: Send + Sync {
    /// Store one record, returning the id the backend assigned
    async fn insert(&self, feedback: NewFeedback) -> BackendResult<Snowflake>;

    /// Most recent records ordered by `created_at` descending
    async fn recent(&self, limit: usize) -> BackendResult<Vec<Feedback>>;

    /// Records inserted from now on, in publish order
    async fn subscribe(&self) -> BackendResult<Subscription>;
}

/// Process-wide backend handle shared by the form and the board
pub type SharedBackend = Arc<dyn FeedbackBackend>;
