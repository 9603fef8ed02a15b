//! Per-board animation cache

use super::{AnimationResource, AnimationSource};
use board_common::AnimationStrategy;
use board_core::Rating;
use futures::future::join_all;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Rating → loaded animation, filled eagerly or on first use
///
/// Every rating is fetched at most once per cache. A failed fetch leaves
/// the rating unresolved and the card falls back to its static glyph.
pub struct AnimationCache {
    source: Arc<dyn AnimationSource>,
    strategy: AnimationStrategy,
    loaded: RwLock<HashMap<Rating, AnimationResource>>,
    attempted: Mutex<HashSet<Rating>>,
}

impl AnimationCache {
    pub fn new(source: Arc<dyn AnimationSource>, strategy: AnimationStrategy) -> Self {
        Self {
            source,
            strategy,
            loaded: RwLock::new(HashMap::new()),
            attempted: Mutex::new(HashSet::new()),
        }
    }

    pub fn strategy(&self) -> AnimationStrategy {
        self.strategy
    }

    /// Eager strategy: fetch all five concurrently and wait for them
    ///
    /// Returns how many loaded. A no-op for the lazy strategy.
    pub async fn preload(&self) -> usize {
        if self.strategy != AnimationStrategy::Eager {
            return 0;
        }

        let results = join_all(Rating::ALL.iter().map(|rating| self.load(*rating))).await;
        let loaded = results.into_iter().filter(|ok| *ok).count();

        tracing::info!(loaded = loaded, total = Rating::ALL.len(), "Animations preloaded");
        loaded
    }

    /// Lazy strategy: fetch the animation for a raw rating on first sight
    ///
    /// Returns whatever is loaded for it afterwards.
    pub async fn ensure(&self, value: Option<i32>) -> Option<AnimationResource> {
        if self.strategy == AnimationStrategy::Lazy {
            if let Some(rating) = rating_of(value) {
                self.load(rating).await;
            }
        }
        self.resolve(value)
    }

    /// Loaded animation for an in-range rating
    pub fn resolve(&self, value: Option<i32>) -> Option<AnimationResource> {
        let rating = rating_of(value)?;
        self.loaded.read().get(&rating).cloned()
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.read().len()
    }

    /// Fetch one rating unless it was attempted before; `true` if newly loaded
    async fn load(&self, rating: Rating) -> bool {
        if !self.attempted.lock().insert(rating) {
            return false;
        }

        match self.source.fetch(rating).await {
            Ok(resource) => {
                self.loaded.write().insert(rating, resource);
                true
            }
            Err(e) => {
                tracing::warn!(rating = %rating, error = %e, "Failed to fetch animation");
                false
            }
        }
    }
}

fn rating_of(value: Option<i32>) -> Option<Rating> {
    value.and_then(|v| Rating::try_from(v).ok())
}

impl std::fmt::Debug for AnimationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationCache")
            .field("strategy", &self.strategy)
            .field("loaded", &self.loaded_count())
            .finish()
    }
}
