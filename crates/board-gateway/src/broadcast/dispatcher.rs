//! Event dispatcher
//!
//! Receives events from Redis Pub/Sub and dispatches them to WebSocket connections.

use crate::connection::ConnectionManager;
use board_cache::{PubSubChannel, ReceivedMessage, Subscriber, SubscriberBuilder, SubscriberError};
use board_common::protocol::FEEDBACK_CREATE;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Configuration for the event dispatcher
#[derive(Debug, Clone)]
pub struct EventDispatcherConfig {
    /// Redis URL
    pub redis_url: String,
    /// Broadcast buffer size
    pub broadcast_buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for EventDispatcherConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            broadcast_buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Event dispatcher that routes the `feedback` channel to every board
pub struct EventDispatcher {
    connection_manager: Arc<ConnectionManager>,
    subscriber: Subscriber,
    running: Arc<AtomicBool>,
}

impl EventDispatcher {
    /// Create a new event dispatcher subscribed to the feedback channel
    pub async fn new(
        config: EventDispatcherConfig,
        connection_manager: Arc<ConnectionManager>,
    ) -> Result<Self, SubscriberError> {
        let subscriber = SubscriberBuilder::new()
            .redis_url(&config.redis_url)
            .broadcast_buffer(config.broadcast_buffer)
            .reconnect_delay_ms(config.reconnect_delay_ms)
            .subscribe(PubSubChannel::Feedback)
            .build()
            .await?;

        Ok(Self {
            connection_manager,
            subscriber,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Start the event dispatcher
    ///
    /// This spawns a background task that receives messages from Redis
    /// and dispatches them to every connected board.
    pub fn start(self: Arc<Self>) {
        if self.running.swap(true, Ordering::SeqCst) {
            tracing::warn!("Event dispatcher is already running");
            return;
        }

        // Subscribe before spawning so nothing published from here on is missed
        let receiver = self.subscriber.receiver();
        let dispatcher = self.clone();
        tokio::spawn(async move {
            dispatcher.run(receiver).await;
        });

        tracing::info!("Event dispatcher started");
    }

    /// Stop the event dispatcher
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.subscriber.shutdown();
        tracing::info!("Event dispatcher stopped");
    }

    /// Run the event dispatcher loop
    async fn run(&self, mut receiver: broadcast::Receiver<ReceivedMessage>) {
        while self.running.load(Ordering::SeqCst) {
            match receiver.recv().await {
                Ok(msg) => {
                    route_message(&self.connection_manager, &msg);
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "Event dispatcher lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::warn!("Event dispatcher channel closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);
        tracing::info!("Event dispatcher loop ended");
    }

    /// Check if the dispatcher is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("channels", &self.subscriber.channels())
            .field("running", &self.is_running())
            .finish()
    }
}

/// Route one Pub/Sub message to the connected boards
///
/// Returns the number of boards the event was queued for.
pub(crate) fn route_message(manager: &ConnectionManager, msg: &ReceivedMessage) -> usize {
    let Some(event) = &msg.event else {
        tracing::debug!(channel = %msg.channel, "Received non-event message, ignoring");
        return 0;
    };

    match &msg.channel {
        PubSubChannel::Feedback => {
            if event.event_type == FEEDBACK_CREATE && event.feedback().is_none() {
                tracing::warn!(
                    event_type = %event.event_type,
                    "Dropping feedback event with malformed payload"
                );
                return 0;
            }

            let sent = manager.dispatch_all(&event.event_type, &event.data);

            tracing::debug!(
                event_type = %event.event_type,
                sent = sent,
                "Event dispatched to boards"
            );

            sent
        }
        PubSubChannel::Custom(name) => {
            tracing::debug!(
                channel = %name,
                event_type = %event.event_type,
                "Received event on custom channel, ignoring"
            );
            0
        }
    }
}
