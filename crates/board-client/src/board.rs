//! Display board
//!
//! A mounted board reads the most recent records once, keeps a push
//! subscription open, and holds the newest `capacity` records in a
//! [`FeedWindow`]. Every state write happens under the state lock and is
//! refused once the board is terminal, so late reads, notifications, and
//! animation fetches cannot touch an unmounted board.

use crate::animation::{AnimationCache, AnimationResource};
use crate::backend::{SharedBackend, Subscription, SubscriptionHandle};
use crate::feed::FeedWindow;
use board_common::AnimationStrategy;
use board_core::{fallback_glyph, Feedback, Rating, Snowflake};
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Cards are stacked in this many lanes
pub const LANES: usize = 4;

/// Delay added per group of [`LANES`] cards
pub const STAGGER_STEP: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Initial read in progress
    Initializing,
    /// Subscription open, notifications applied as they arrive
    Live,
    /// Unmounted; state is frozen
    Terminal,
}

/// One rendered record
#[derive(Debug, Clone)]
pub struct CardView {
    pub id: Snowflake,
    pub name: String,
    pub comment: String,
    /// Static glyph shown when no animation is loaded
    pub glyph: &'static str,
    pub animation: Option<AnimationResource>,
    pub lane: usize,
    pub stagger: Duration,
}

impl CardView {
    fn new(index: usize, record: &Feedback, animation: Option<AnimationResource>) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            comment: record.comment.clone(),
            glyph: fallback_glyph(record.emoji),
            animation,
            lane: index % LANES,
            stagger: STAGGER_STEP * u32::try_from(index / LANES).unwrap_or(u32::MAX),
        }
    }
}

struct BoardState {
    phase: BoardPhase,
    window: FeedWindow,
    version: u64,
}

/// State shared with the driver and animation tasks
struct Shared {
    state: Mutex<BoardState>,
    changes: watch::Sender<u64>,
    animations: Arc<AnimationCache>,
}

impl Shared {
    fn phase(&self) -> BoardPhase {
        self.state.lock().phase
    }

    /// Apply `f` unless terminal, then announce a new version
    fn mutate<R>(&self, f: impl FnOnce(&mut BoardState) -> R) -> Option<R> {
        let mut state = self.state.lock();
        if state.phase == BoardPhase::Terminal {
            return None;
        }

        let result = f(&mut state);
        state.version += 1;
        self.changes.send_replace(state.version);
        Some(result)
    }

    /// Lazy strategy: fetch the animation for a rating in the background
    fn request_animation(self: &Arc<Self>, value: Option<i32>) {
        if self.animations.strategy() != AnimationStrategy::Lazy
            || value.and_then(|v| Rating::try_from(v).ok()).is_none()
            || self.animations.resolve(value).is_some()
        {
            return;
        }

        let shared = Arc::clone(self);
        tokio::spawn(async move {
            if shared.animations.ensure(value).await.is_some() {
                // Repaint so the card picks the animation up
                shared.mutate(|_| ());
            }
        });
    }
}

/// Bounded, most-recent-first view of the feedback feed
pub struct DisplayBoard {
    backend: SharedBackend,
    shared: Arc<Shared>,
    mounted: AtomicBool,
    subscription: Mutex<Option<SubscriptionHandle>>,
    driver: Mutex<Option<JoinHandle<()>>>,
}

impl DisplayBoard {
    pub fn new(backend: SharedBackend, animations: Arc<AnimationCache>, capacity: usize) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            backend,
            shared: Arc::new(Shared {
                state: Mutex::new(BoardState {
                    phase: BoardPhase::Initializing,
                    window: FeedWindow::new(capacity),
                    version: 0,
                }),
                changes,
                animations,
            }),
            mounted: AtomicBool::new(false),
            subscription: Mutex::new(None),
            driver: Mutex::new(None),
        }
    }

    /// Open the subscription, read the most recent records, and go live
    ///
    /// The subscription, the initial read, and the eager animation batch run
    /// concurrently. A successful read replaces whatever notifications
    /// arrived before it; a failed one leaves them in place. The board goes
    /// live either way.
    pub async fn mount(&self) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            tracing::warn!("Board already mounted");
            return;
        }
        if self.phase() == BoardPhase::Terminal {
            return;
        }

        let capacity = self.capacity();
        let ((), initial, _) = tokio::join!(
            self.open_subscription(),
            self.backend.recent(capacity),
            self.shared.animations.preload(),
        );

        match initial {
            Ok(records) => {
                let emojis: Vec<Option<i32>> = records.iter().map(|r| r.emoji).collect();
                let count = records.len();
                if self.shared.mutate(|state| state.window.replace(records)).is_some() {
                    tracing::info!(count = count, "Initial feed loaded");
                    for emoji in emojis {
                        self.shared.request_animation(emoji);
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load initial feed");
            }
        }

        self.shared.mutate(|state| state.phase = BoardPhase::Live);
    }

    async fn open_subscription(&self) {
        let subscription = match self.backend.subscribe().await {
            Ok(subscription) => subscription,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to subscribe to feedback");
                return;
            }
        };

        // Slot before phase, the same order unmount takes them in
        let mut slot = self.subscription.lock();
        if self.phase() == BoardPhase::Terminal {
            return;
        }

        *slot = Some(subscription.handle());
        let driver = tokio::spawn(drive(Arc::clone(&self.shared), subscription));
        *self.driver.lock() = Some(driver);
    }

    /// Close the subscription and freeze the board; safe to repeat
    pub fn unmount(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.phase == BoardPhase::Terminal {
                return;
            }
            state.phase = BoardPhase::Terminal;
        }

        if let Some(handle) = self.subscription.lock().take() {
            handle.unsubscribe();
        }
        if let Some(driver) = self.driver.lock().take() {
            driver.abort();
        }

        tracing::info!("Board unmounted");
    }

    pub fn phase(&self) -> BoardPhase {
        self.shared.phase()
    }

    pub fn capacity(&self) -> usize {
        self.shared.state.lock().window.capacity()
    }

    /// Current records, most recent first
    pub fn records(&self) -> Vec<Feedback> {
        self.shared.state.lock().window.records()
    }

    /// Current records laid out as cards
    pub fn cards(&self) -> Vec<CardView> {
        let records = self.records();
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                CardView::new(index, record, self.shared.animations.resolve(record.emoji))
            })
            .collect()
    }

    /// Receiver that ticks on every state change
    pub fn changes(&self) -> watch::Receiver<u64> {
        self.shared.changes.subscribe()
    }
}

impl Drop for DisplayBoard {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl std::fmt::Debug for DisplayBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.state.lock();
        f.debug_struct("DisplayBoard")
            .field("phase", &state.phase)
            .field("records", &state.window.len())
            .field("version", &state.version)
            .finish()
    }
}

/// Prepend every pushed record until the board stops or the stream ends
async fn drive(shared: Arc<Shared>, mut subscription: Subscription) {
    while let Some(record) = subscription.next().await {
        let emoji = record.emoji;
        let Some(evicted) = shared.mutate(|state| state.window.push(record)) else {
            break;
        };
        if let Some(evicted) = evicted {
            tracing::trace!(id = %evicted.id, "Record evicted from feed");
        }
        shared.request_animation(emoji);
    }

    tracing::debug!("Board subscription ended");
}
