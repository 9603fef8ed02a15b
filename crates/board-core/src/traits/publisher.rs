//! Event publishing port

use async_trait::async_trait;

use crate::error::DomainError;
use crate::events::DomainEvent;

/// Fan-out of domain events to realtime subscribers
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event; returns how many subscribers received it
    async fn publish(&self, event: &DomainEvent) -> Result<u32, DomainError>;
}
