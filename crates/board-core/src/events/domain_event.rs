//! Domain events - emitted when board state changes
//!
//! Events are serialized onto the pub/sub bus and forwarded to every
//! connected display board as gateway dispatches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::Feedback;

/// All possible domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainEvent {
    FeedbackCreated(FeedbackCreatedEvent),
}

impl DomainEvent {
    pub fn feedback_created(feedback: Feedback) -> Self {
        Self::FeedbackCreated(FeedbackCreatedEvent {
            feedback,
            timestamp: Utc::now(),
        })
    }

    /// Dispatch name seen by gateway clients
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FeedbackCreated(_) => "FEEDBACK_CREATE",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::FeedbackCreated(e) => e.timestamp,
        }
    }

    /// Payload forwarded to subscribers
    pub fn payload(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::FeedbackCreated(e) => serde_json::to_value(&e.feedback),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackCreatedEvent {
    pub feedback: Feedback,
    pub timestamp: DateTime<Utc>,
}
