//! Redis Pub/Sub publisher.
//!
//! Publishes events to Redis channels for distribution to WebSocket clients.

use async_trait::async_trait;
use board_common::protocol::FEEDBACK_CREATE;
use board_core::{DomainError, DomainEvent, EventPublisher, Feedback};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::PubSubChannel;

/// Event wrapper for Pub/Sub messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubSubEvent {
    /// Event type name, e.g. `FEEDBACK_CREATE`
    pub event_type: String,
    /// Event payload
    pub data: serde_json::Value,
}

impl PubSubEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
        }
    }

    /// Wrap a domain event
    pub fn from_domain(event: &DomainEvent) -> Result<Self, serde_json::Error> {
        Ok(Self::new(event.event_type(), event.payload()?))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode the payload of a `FEEDBACK_CREATE` event
    pub fn feedback(&self) -> Option<Feedback> {
        if self.event_type != FEEDBACK_CREATE {
            return None;
        }
        serde_json::from_value(self.data.clone()).ok()
    }
}

/// Redis Pub/Sub publisher
#[derive(Clone)]
pub struct Publisher {
    pool: RedisPool,
}

impl Publisher {
    /// Create a new publisher
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish an event to a channel, returning the number of receivers
    pub async fn publish(&self, channel: &PubSubChannel, event: &PubSubEvent) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel_name = channel.name();
        let payload = event.to_json()?;

        let receivers: u32 = conn.publish(&channel_name, &payload).await?;

        tracing::debug!(
            channel = %channel_name,
            event_type = %event.event_type,
            receivers = receivers,
            "Published event"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventPublisher for Publisher {
    async fn publish(&self, event: &DomainEvent) -> Result<u32, DomainError> {
        let event = PubSubEvent::from_domain(event)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        Publisher::publish(self, &PubSubChannel::Feedback, &event)
            .await
            .map_err(|e| DomainError::CacheError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::Snowflake;
    use chrono::Utc;

    fn sample() -> Feedback {
        Feedback::new(
            Snowflake::new(42),
            "Alice".to_string(),
            "Great experience!".to_string(),
            Some(5),
            Utc::now(),
        )
    }

    #[test]
    fn test_pubsub_event_creation() {
        let data = serde_json::json!({"id": "12345"});
        let event = PubSubEvent::new("FEEDBACK_CREATE", data.clone());
        assert_eq!(event.event_type, "FEEDBACK_CREATE");
        assert_eq!(event.data, data);
    }

    #[test]
    fn test_from_domain_event() {
        let feedback = sample();
        let event = PubSubEvent::from_domain(&DomainEvent::feedback_created(feedback.clone()))
            .unwrap();

        assert_eq!(event.event_type, FEEDBACK_CREATE);
        assert_eq!(event.data["id"], "42");
        assert_eq!(event.feedback(), Some(feedback));
    }

    #[test]
    fn test_feedback_ignores_other_events() {
        let event = PubSubEvent::new("SOMETHING_ELSE", serde_json::to_value(sample()).unwrap());
        assert!(event.feedback().is_none());

        let event = PubSubEvent::new(FEEDBACK_CREATE, serde_json::json!({"id": "x"}));
        assert!(event.feedback().is_none());
    }

    #[test]
    fn test_event_serialization() {
        let json = PubSubEvent::new("FEEDBACK_CREATE", serde_json::json!({"name": "Bob"}))
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"event_type":"FEEDBACK_CREATE","data":{"name":"Bob"}}"#);
    }
}
