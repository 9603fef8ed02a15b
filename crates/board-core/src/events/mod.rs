//! Domain events

mod domain_event;

pub use domain_event::{DomainEvent, FeedbackCreatedEvent};
