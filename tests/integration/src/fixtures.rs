//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Timestamp far enough ahead that test records sort above real ones,
/// and above those of earlier test runs
pub fn future_time(offset_secs: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(365 * 50) + Duration::seconds(offset_secs)
}

/// Submit feedback request
#[derive(Debug, Clone, Serialize)]
pub struct CreateFeedback {
    pub name: String,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CreateFeedback {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("visitor{suffix}-{}", std::process::id()),
            comment: "Great experience! Would definitely recommend.".to_string(),
            emoji: Some(5),
            created_at: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    pub fn with_emoji(mut self, emoji: Option<i32>) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Stored feedback as returned by the API
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackBody {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub emoji: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Error body
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Form choices
#[derive(Debug, Deserialize)]
pub struct OptionsBody {
    pub presets: Vec<String>,
    pub ratings: Vec<RatingBody>,
}

#[derive(Debug, Deserialize)]
pub struct RatingBody {
    pub value: i32,
    pub label: String,
    pub glyph: String,
    pub option_label: String,
    pub animation_code: String,
}
