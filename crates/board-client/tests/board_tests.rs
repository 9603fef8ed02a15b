//! Display board lifecycle against the in-process backend

use async_trait::async_trait;
use board_client::animation::FetchError;
use board_client::backend::NewFeedback;
use board_client::{
    AnimationCache, AnimationResource, AnimationSource, BoardPhase, DisplayBoard, FeedbackBackend,
    MemoryBackend,
};
use board_common::AnimationStrategy;
use board_core::{Feedback, Rating, SnowflakeGenerator};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

struct FakeAnimations {
    fetches: AtomicUsize,
}

#[async_trait]
impl AnimationSource for FakeAnimations {
    async fn fetch(&self, rating: Rating) -> Result<AnimationResource, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(AnimationResource::new(
            rating,
            serde_json::json!({"nm": rating.animation_code()}),
        ))
    }
}

fn animations(strategy: AnimationStrategy) -> (Arc<FakeAnimations>, Arc<AnimationCache>) {
    let source = Arc::new(FakeAnimations {
        fetches: AtomicUsize::new(0),
    });
    let cache = Arc::new(AnimationCache::new(source.clone(), strategy));
    (source, cache)
}

fn board(backend: &Arc<MemoryBackend>, capacity: usize) -> DisplayBoard {
    let (_, cache) = animations(AnimationStrategy::Eager);
    DisplayBoard::new(backend.clone(), cache, capacity)
}

fn at(minute: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap() + ChronoDuration::minutes(minute)
}

fn record(generator: &SnowflakeGenerator, name: &str, minute: i64) -> Feedback {
    Feedback::new(
        generator.generate(),
        name.to_string(),
        "Good service but room for improvement.".to_string(),
        Some(4),
        at(minute),
    )
}

fn submission(name: &str, minute: i64) -> NewFeedback {
    NewFeedback {
        name: name.to_string(),
        comment: "Great experience! Would definitely recommend.".to_string(),
        emoji: Some(5),
        created_at: at(minute),
    }
}

fn names(board: &DisplayBoard) -> Vec<String> {
    board.records().into_iter().map(|r| r.name).collect()
}

async fn wait_until(board: &DisplayBoard, mut check: impl FnMut(&DisplayBoard) -> bool) {
    let mut changes = board.changes();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !check(board) {
            changes.changed().await.unwrap();
        }
    })
    .await
    .expect("board never reached the expected state");
}

#[tokio::test]
async fn test_initial_read_is_shown_newest_first() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([
        record(&generator, "Ana", 1),
        record(&generator, "Cy", 3),
        record(&generator, "Ben", 2),
    ]);

    let board = board(&backend, 12);
    assert_eq!(board.phase(), BoardPhase::Initializing);
    board.mount().await;

    assert_eq!(board.phase(), BoardPhase::Live);
    assert_eq!(names(&board), vec!["Cy", "Ben", "Ana"]);
}

#[tokio::test]
async fn test_initial_read_is_limited_to_capacity() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed((0..20).map(|i| record(&generator, &format!("v{i}"), i)));

    let board = board(&backend, 12);
    board.mount().await;

    let shown = names(&board);
    assert_eq!(shown.len(), 12);
    assert_eq!(shown[0], "v19");
    assert_eq!(shown[11], "v8");
}

#[tokio::test]
async fn test_notification_is_prepended() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "Ana", 1)]);

    let board = board(&backend, 12);
    board.mount().await;

    backend.insert(submission("Ben", 2)).await.unwrap();
    wait_until(&board, |b| b.records().len() == 2).await;

    assert_eq!(names(&board), vec!["Ben", "Ana"]);
}

#[tokio::test]
async fn test_full_window_evicts_oldest() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed((1..=3).map(|i| record(&generator, &format!("v{i}"), i)));

    let board = board(&backend, 3);
    board.mount().await;
    assert_eq!(names(&board), vec!["v3", "v2", "v1"]);

    backend.insert(submission("new", 10)).await.unwrap();
    wait_until(&board, |b| b.records()[0].name == "new").await;

    assert_eq!(names(&board), vec!["new", "v3", "v2"]);
}

#[tokio::test]
async fn test_arrival_order_is_kept_without_resorting() {
    let backend = Arc::new(MemoryBackend::new());
    let board = board(&backend, 12);
    board.mount().await;

    // Older timestamp arrives last and still goes on top
    backend.insert(submission("late", 30)).await.unwrap();
    backend.insert(submission("early", 5)).await.unwrap();
    wait_until(&board, |b| b.records().len() == 2).await;

    assert_eq!(names(&board), vec!["early", "late"]);
}

#[tokio::test]
async fn test_duplicate_notifications_are_kept() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    let board = board(&backend, 12);
    board.mount().await;

    let twice = record(&generator, "Ana", 1);
    backend.notify(&twice);
    backend.notify(&twice);
    wait_until(&board, |b| b.records().len() == 2).await;

    let records = board.records();
    assert_eq!(records[0].id, records[1].id);
}

#[tokio::test]
async fn test_failed_read_still_goes_live() {
    let backend = Arc::new(MemoryBackend::new());
    backend.set_fail_reads(true);

    let board = board(&backend, 12);
    board.mount().await;

    assert_eq!(board.phase(), BoardPhase::Live);
    assert!(board.records().is_empty());

    backend.insert(submission("Ana", 1)).await.unwrap();
    wait_until(&board, |b| b.records().len() == 1).await;
}

#[tokio::test]
async fn test_failed_subscribe_still_shows_initial_read() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "Ana", 1)]);
    backend.set_fail_subscribe(true);

    let board = board(&backend, 12);
    board.mount().await;

    assert_eq!(board.phase(), BoardPhase::Live);
    assert_eq!(names(&board), vec!["Ana"]);
    assert_eq!(backend.subscriber_count(), 0);
}

#[tokio::test]
async fn test_read_result_replaces_early_notifications() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "stored", 1)]);
    backend.set_read_delay(Some(Duration::from_millis(300)));

    let board = board(&backend, 12);
    let early = record(&generator, "early", 2);

    tokio::join!(board.mount(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        backend.notify(&early);
        wait_until(&board, |b| !b.records().is_empty()).await;
        assert_eq!(names(&board), vec!["early"]);
        assert_eq!(board.phase(), BoardPhase::Initializing);
    });

    assert_eq!(board.phase(), BoardPhase::Live);
    assert_eq!(names(&board), vec!["stored"]);
}

#[tokio::test]
async fn test_unmount_is_idempotent_and_freezes_state() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "Ana", 1)]);

    let board = board(&backend, 12);
    board.mount().await;
    assert_eq!(backend.subscriber_count(), 1);

    board.unmount();
    board.unmount();
    assert_eq!(board.phase(), BoardPhase::Terminal);
    assert_eq!(backend.subscriber_count(), 0);

    backend.notify(&record(&generator, "Ben", 2));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(names(&board), vec!["Ana"]);

    // Mounting an unmounted board does nothing
    board.mount().await;
    assert_eq!(board.phase(), BoardPhase::Terminal);
}

#[tokio::test]
async fn test_unmount_during_initial_read_discards_result() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "stored", 1)]);
    backend.set_read_delay(Some(Duration::from_millis(300)));

    let board = board(&backend, 12);

    tokio::join!(board.mount(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        board.unmount();
    });

    assert_eq!(board.phase(), BoardPhase::Terminal);
    assert!(board.records().is_empty());
    assert_eq!(backend.subscriber_count(), 0);

    // Pushes after the late read still go nowhere
    backend.notify(&record(&generator, "late", 2));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(board.records().is_empty());
}

#[tokio::test]
async fn test_unmount_before_mount_never_fails() {
    let backend = Arc::new(MemoryBackend::new());
    let board = board(&backend, 12);

    board.unmount();
    board.unmount();
    assert_eq!(board.phase(), BoardPhase::Terminal);
    assert_eq!(backend.subscriber_count(), 0);
}

#[tokio::test]
async fn test_drop_releases_subscription() {
    let backend = Arc::new(MemoryBackend::new());
    let board = board(&backend, 12);
    board.mount().await;
    assert_eq!(backend.subscriber_count(), 1);

    drop(board);
    assert_eq!(backend.subscriber_count(), 0);
}

#[tokio::test]
async fn test_eager_animations_are_ready_at_first_paint() {
    let backend = Arc::new(MemoryBackend::new());
    let generator = SnowflakeGenerator::default();
    backend.seed([record(&generator, "Ana", 1)]);

    let (source, cache) = animations(AnimationStrategy::Eager);
    let board = DisplayBoard::new(backend.clone(), cache, 12);
    board.mount().await;

    assert_eq!(source.fetches.load(Ordering::SeqCst), 5);
    let card = &board.cards()[0];
    assert_eq!(card.animation.as_ref().unwrap().rating, Rating::Good);
    assert_eq!(card.glyph, "🙂");
}

#[tokio::test]
async fn test_lazy_animations_load_on_first_sight() {
    let backend = Arc::new(MemoryBackend::new());
    let (source, cache) = animations(AnimationStrategy::Lazy);
    let board = DisplayBoard::new(backend.clone(), cache, 12);
    board.mount().await;
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);

    backend.insert(submission("Ana", 1)).await.unwrap();
    backend.insert(submission("Ben", 2)).await.unwrap();
    wait_until(&board, |b| {
        let cards = b.cards();
        cards.len() == 2 && cards.iter().all(|c| c.animation.is_some())
    })
    .await;

    assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
}
