//! Emoji animation resources
//!
//! Resolves each rating to its Lottie animation document and caches the
//! result for the lifetime of a board. Playback is left to the renderer.

mod cache;
mod source;

pub use cache::AnimationCache;
pub use source::HttpAnimationSource;

use async_trait::async_trait;
use board_core::Rating;
use std::sync::Arc;

/// A loaded animation document for one rating
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationResource {
    pub rating: Rating,
    /// Raw Lottie JSON
    pub data: Arc<serde_json::Value>,
}

impl AnimationResource {
    pub fn new(rating: Rating, data: serde_json::Value) -> Self {
        Self {
            rating,
            data: Arc::new(data),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Animation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Animation server answered {0}")]
    Status(u16),

    #[error("{0}")]
    Unavailable(String),
}

/// Where animation documents come from
#[async_trait]
pub trait AnimationSource: Send + Sync {
    async fn fetch(&self, rating: Rating) -> Result<AnimationResource, FetchError>;
}
