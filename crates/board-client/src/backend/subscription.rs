//! Cancellable push subscription
//!
//! The consumer side is a [`Stream`] of records. Cancelling is idempotent,
//! happens on drop, and stops the producer task at its next await point.

use board_core::Feedback;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};

/// Records buffered between the transport task and the consumer
const SUBSCRIPTION_BUFFER: usize = 256;

/// Consumer side: a stream of newly inserted records
pub struct Subscription {
    receiver: mpsc::Receiver<Feedback>,
    handle: SubscriptionHandle,
}

/// Cloneable handle that cancels a [`Subscription`] from anywhere
#[derive(Clone)]
pub struct SubscriptionHandle {
    cancel: Arc<watch::Sender<bool>>,
}

/// Producer side, owned by whatever feeds the subscription
#[derive(Clone)]
pub struct SubscriptionSink {
    sender: mpsc::Sender<Feedback>,
    cancelled: watch::Receiver<bool>,
}

impl Subscription {
    /// Create a connected subscription/sink pair
    pub fn channel() -> (Self, SubscriptionSink) {
        let (sender, receiver) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let (cancel, cancelled) = watch::channel(false);

        let subscription = Self {
            receiver,
            handle: SubscriptionHandle {
                cancel: Arc::new(cancel),
            },
        };
        (subscription, SubscriptionSink { sender, cancelled })
    }

    /// Handle for cancelling this subscription without owning the stream
    pub fn handle(&self) -> SubscriptionHandle {
        self.handle.clone()
    }

    /// Stop delivery; safe to call any number of times
    pub fn unsubscribe(&mut self) {
        self.handle.unsubscribe();
        self.receiver.close();
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }
}

impl Stream for Subscription {
    type Item = Feedback;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.handle.is_closed() {
            return Poll::Ready(None);
        }
        self.receiver.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.unsubscribe();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl SubscriptionHandle {
    /// Cancel the subscription; later calls are no-ops
    pub fn unsubscribe(&self) {
        if !self.cancel.send_replace(true) {
            tracing::debug!("Subscription cancelled");
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.cancel.borrow()
    }
}

impl SubscriptionSink {
    /// Deliver a record; `false` once the consumer has gone away
    pub async fn send(&self, feedback: Feedback) -> bool {
        if self.is_cancelled() {
            return false;
        }
        self.sender.send(feedback).await.is_ok()
    }

    /// Non-blocking delivery; drops the record when the buffer is full
    pub fn try_send(&self, feedback: Feedback) -> bool {
        if self.is_cancelled() {
            return false;
        }
        match self.sender.try_send(feedback) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                tracing::warn!(id = %dropped.id, "Subscriber buffer full, dropping record");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow() || self.sender.is_closed()
    }

    /// Resolves once the subscription is cancelled or dropped
    pub async fn cancelled(&self) {
        let mut cancelled = self.cancelled.clone();
        while !*cancelled.borrow_and_update() {
            if cancelled.changed().await.is_err() {
                return;
            }
        }
    }
}
