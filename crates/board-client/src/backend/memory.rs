//! In-process backend
//!
//! Holds records in memory and pushes every insert to open subscriptions.
//! Failure switches and a read delay let tests exercise degraded paths.

use super::{BackendError, BackendResult, FeedbackBackend, NewFeedback, Subscription, SubscriptionSink};
use async_trait::async_trait;
use board_core::{Feedback, Snowflake, SnowflakeGenerator};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct MemoryBackend {
    records: RwLock<Vec<Feedback>>,
    subscribers: Mutex<Vec<SubscriptionSink>>,
    generator: SnowflakeGenerator,
    inserts: AtomicUsize,
    fail_inserts: AtomicBool,
    fail_reads: AtomicBool,
    fail_subscribe: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate stored records without notifying subscribers
    pub fn seed(&self, records: impl IntoIterator<Item = Feedback>) {
        self.records.write().extend(records);
    }

    /// Push a record to subscribers without storing it
    ///
    /// Returns the number of live subscriptions it reached.
    pub fn notify(&self, feedback: &Feedback) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sink| sink.try_send(feedback.clone()));
        subscribers.len()
    }

    /// Number of successful inserts so far
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Every stored record, in insertion order
    pub fn stored(&self) -> Vec<Feedback> {
        self.records.read().clone()
    }

    /// Subscriptions still receiving records
    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sink| !sink.is_cancelled());
        subscribers.len()
    }

    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_subscribe(&self, fail: bool) {
        self.fail_subscribe.store(fail, Ordering::SeqCst);
    }

    /// Hold every `recent` call for `delay` before answering
    pub fn set_read_delay(&self, delay: Option<Duration>) {
        *self.read_delay.lock() = delay;
    }
}

#[async_trait]
impl FeedbackBackend for MemoryBackend {
    async fn insert(&self, feedback: NewFeedback) -> BackendResult<Snowflake> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("inserts disabled".to_string()));
        }

        let record = Feedback::new(
            self.generator.generate(),
            feedback.name,
            feedback.comment,
            feedback.emoji,
            feedback.created_at,
        );
        let id = record.id;

        self.records.write().push(record.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        self.notify(&record);

        Ok(id)
    }

    async fn recent(&self, limit: usize) -> BackendResult<Vec<Feedback>> {
        let delay = *self.read_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("reads disabled".to_string()));
        }

        let mut records = self.records.read().clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    async fn subscribe(&self) -> BackendResult<Subscription> {
        if self.fail_subscribe.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("subscriptions disabled".to_string()));
        }

        let (subscription, sink) = Subscription::channel();
        self.subscribers.lock().push(sink);
        Ok(subscription)
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("records", &self.records.read().len())
            .field("inserts", &self.insert_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};
    use futures::StreamExt;

    fn new_feedback(name: &str, minute: i64) -> NewFeedback {
        NewFeedback {
            name: name.to_string(),
            comment: "Average experience, nothing special.".to_string(),
            emoji: Some(3),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
                + ChronoDuration::minutes(minute),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_unique_ids() {
        let backend = MemoryBackend::new();
        let a = backend.insert(new_feedback("Ana", 0)).await.unwrap();
        let b = backend.insert(new_feedback("Ben", 1)).await.unwrap();

        assert_ne!(a, b);
        assert_eq!(backend.insert_count(), 2);
        assert_eq!(backend.stored()[0].name, "Ana");
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_limited() {
        let backend = MemoryBackend::new();
        for (minute, name) in [(5, "Cy"), (1, "Ana"), (9, "Dee"), (3, "Ben")] {
            backend.insert(new_feedback(name, minute)).await.unwrap();
        }

        let names: Vec<String> = backend
            .recent(3)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Dee", "Cy", "Ben"]);
    }

    #[tokio::test]
    async fn test_insert_reaches_subscribers() {
        let backend = MemoryBackend::new();
        let mut subscription = backend.subscribe().await.unwrap();

        let id = backend.insert(new_feedback("Ana", 0)).await.unwrap();
        assert_eq!(subscription.next().await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_cancelled_subscribers_are_pruned() {
        let backend = MemoryBackend::new();
        let mut subscription = backend.subscribe().await.unwrap();
        assert_eq!(backend.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(backend.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_failure_switches() {
        let backend = MemoryBackend::new();
        backend.set_fail_inserts(true);
        backend.set_fail_reads(true);
        backend.set_fail_subscribe(true);

        assert!(backend.insert(new_feedback("Ana", 0)).await.is_err());
        assert!(backend.recent(12).await.is_err());
        assert!(backend.subscribe().await.is_err());
        assert_eq!(backend.insert_count(), 0);
    }
}
