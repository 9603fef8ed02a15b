//! Redis Pub/Sub module.
//!
//! Carries newly stored feedback from the API process to every gateway.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{PubSubChannel, FEEDBACK_CHANNEL};
pub use publisher::{PubSubEvent, Publisher};
pub use subscriber::{
    ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberConfig, SubscriberError,
    SubscriberResult,
};
