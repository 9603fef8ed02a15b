//! Redis Pub/Sub subscriber.
//!
//! Holds a dedicated Redis connection subscribed to a fixed set of channels
//! and re-broadcasts every message to in-process receivers. The connection is
//! re-established after errors; messages published while it is down are lost.

use crate::pool::redact;
use crate::pubsub::{PubSubChannel, PubSubEvent};
use futures_util::StreamExt;
use redis::Client;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Failed to parse event: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("No channels to subscribe to")]
    NoChannels,
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Received message from Pub/Sub
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Channel the message was received on
    pub channel: PubSubChannel,
    /// Parsed event (if valid JSON)
    pub event: Option<PubSubEvent>,
    /// Raw payload
    pub payload: String,
}

impl ReceivedMessage {
    /// Create from raw Redis message
    fn from_redis(channel_name: &str, payload: String) -> Self {
        let channel = PubSubChannel::parse(channel_name);
        let event = serde_json::from_str(&payload).ok();

        Self {
            channel,
            event,
            payload,
        }
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Channel buffer size for broadcast
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Redis Pub/Sub subscriber
pub struct Subscriber {
    channels: Vec<String>,
    /// Broadcast sender for messages
    broadcast_tx: broadcast::Sender<ReceivedMessage>,
    shutdown_tx: watch::Sender<bool>,
}

impl Subscriber {
    /// Create a new subscriber and start the background listener
    pub fn new(config: SubscriberConfig, channels: &[PubSubChannel]) -> SubscriberResult<Self> {
        if channels.is_empty() {
            return Err(SubscriberError::NoChannels);
        }

        // Validate the URL up front; the connection itself is made by the listener
        let client = Client::open(config.redis_url.as_str())?;
        let channels: Vec<String> = channels.iter().map(PubSubChannel::name).collect();
        let (broadcast_tx, _) = broadcast::channel(config.broadcast_buffer);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(Self::listener_loop(
            client,
            config,
            channels.clone(),
            broadcast_tx.clone(),
            shutdown_rx,
        ));

        Ok(Self {
            channels,
            broadcast_tx,
            shutdown_tx,
        })
    }

    /// Background listener loop
    async fn listener_loop(
        client: Client,
        config: SubscriberConfig,
        channels: Vec<String>,
        broadcast_tx: broadcast::Sender<ReceivedMessage>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        let delay = Duration::from_millis(config.reconnect_delay_ms);

        loop {
            match Self::run_listener(&client, &channels, &broadcast_tx, &mut shutdown_rx).await {
                Ok(true) => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
                Ok(false) => {
                    tracing::warn!(url = %redact(&config.redis_url), "Pub/Sub stream ended, reconnecting");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber error, reconnecting...");
                }
            }

            tokio::select! {
                () = tokio::time::sleep(delay) => {}
                _ = shutdown_rx.changed() => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
            }
        }
    }

    /// Run the listener until error or shutdown; `Ok(true)` means shutdown
    async fn run_listener(
        client: &Client,
        channels: &[String],
        broadcast_tx: &broadcast::Sender<ReceivedMessage>,
        shutdown_rx: &mut watch::Receiver<bool>,
    ) -> SubscriberResult<bool> {
        let mut pubsub = client.get_async_pubsub().await?;
        for channel in channels {
            pubsub.subscribe(channel).await?;
        }

        tracing::info!(channels = ?channels, "Subscriber connected to Redis");

        let mut stream = pubsub.into_on_message();

        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        return Ok(false);
                    };
                    let channel_name = msg.get_channel_name().to_string();
                    let payload: String = msg.get_payload().unwrap_or_default();

                    // No receivers is not an error
                    let _ = broadcast_tx.send(ReceivedMessage::from_redis(&channel_name, payload));

                    tracing::trace!(channel = %channel_name, "Received Pub/Sub message");
                }
                _ = shutdown_rx.changed() => {
                    return Ok(true);
                }
            }
        }
    }

    /// Get a receiver for broadcast messages
    #[must_use]
    pub fn receiver(&self) -> broadcast::Receiver<ReceivedMessage> {
        self.broadcast_tx.subscribe()
    }

    /// Channels this subscriber listens on
    #[must_use]
    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    /// Stop the background listener
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for Subscriber {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Builder for subscriber
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    channels: Vec<PubSubChannel>,
}

impl SubscriberBuilder {
    /// Create a new builder
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SubscriberConfig::default(),
            channels: Vec::new(),
        }
    }

    /// Set Redis URL
    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    /// Set broadcast buffer size
    #[must_use]
    pub fn broadcast_buffer(mut self, size: usize) -> Self {
        self.config.broadcast_buffer = size;
        self
    }

    /// Set reconnection delay
    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    /// Add a channel subscription
    #[must_use]
    pub fn subscribe(mut self, channel: PubSubChannel) -> Self {
        if !self.channels.contains(&channel) {
            self.channels.push(channel);
        }
        self
    }

    /// Build and start the subscriber
    pub async fn build(self) -> SubscriberResult<Subscriber> {
        Subscriber::new(self.config, &self.channels)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
