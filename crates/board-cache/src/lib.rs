//! # board-cache
//!
//! Redis connection pooling and pub/sub fan-out of new feedback.
//!
//! The API process publishes every stored record on the `feedback` channel;
//! each gateway process subscribes to it and relays the record to its
//! WebSocket clients.
//!
//! ## Example
//!
//! ```ignore
//! use board_cache::{PubSubChannel, PubSubEvent, Publisher, RedisPool, RedisPoolConfig, SubscriberBuilder};
//!
//! let pool = RedisPool::new(RedisPoolConfig::default())?;
//! let publisher = Publisher::new(pool.clone());
//! let event = PubSubEvent::new("FEEDBACK_CREATE", serde_json::to_value(&feedback)?);
//! publisher.publish(&PubSubChannel::Feedback, &event).await?;
//!
//! let subscriber = SubscriberBuilder::new()
//!     .redis_url("redis://127.0.0.1:6379")
//!     .subscribe(PubSubChannel::Feedback)
//!     .build()
//!     .await?;
//! let mut rx = subscriber.receiver();
//! ```

pub mod pool;
pub mod pubsub;

// Re-export pool types
pub use pool::{
    create_shared_pool, RedisPool, RedisPoolConfig, RedisPoolError, RedisResult, SharedRedisPool,
};

// Re-export pubsub types
pub use pubsub::{
    PubSubChannel, PubSubEvent, Publisher, ReceivedMessage, Subscriber, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, FEEDBACK_CHANNEL,
};
