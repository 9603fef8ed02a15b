//! Feedback entity - one persisted board submission

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{fallback_glyph, Rating, Snowflake};

/// Feedback entity
///
/// Records are append-only: created once at submission, never edited or removed.
/// `created_at` is the sole ordering key for every read and merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Snowflake,
    pub name: String,
    pub comment: String,
    /// Raw rating value as stored; `None` for variants without a rating
    #[serde(default)]
    pub emoji: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    /// Create a new Feedback record
    pub fn new(
        id: Snowflake,
        name: String,
        comment: String,
        emoji: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            comment,
            emoji,
            created_at,
        }
    }

    /// Typed rating, if the stored value is in range
    pub fn rating(&self) -> Option<Rating> {
        self.emoji.and_then(|value| Rating::try_from(value).ok())
    }

    /// Static glyph shown when no animation is available
    #[inline]
    pub fn fallback_glyph(&self) -> &'static str {
        fallback_glyph(self.emoji)
    }
}
