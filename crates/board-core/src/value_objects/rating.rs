//! Rating - the five-point emoji scale attached to feedback
//!
//! | value | label        | glyph | animation |
//! |-------|--------------|-------|-----------|
//! | 5     | Very Good    | 😄    | 1f603     |
//! | 4     | Good         | 🙂    | 1f642     |
//! | 3     | Neutral      | 😐    | 1f610     |
//! | 2     | Poor         | 🙁    | 1f641     |
//! | 1     | Disappointed | 😞    | 1f61e     |

use serde::{Deserialize, Serialize};
use std::fmt;

/// Emoji rating in the closed range 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rating {
    Disappointed = 1,
    Poor = 2,
    Neutral = 3,
    Good = 4,
    VeryGood = 5,
}

/// Error when converting an out-of-range integer into a [`Rating`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct InvalidRating(pub i32);

impl Rating {
    /// All ratings, best first (form display order)
    pub const ALL: [Rating; 5] = [
        Rating::VeryGood,
        Rating::Good,
        Rating::Neutral,
        Rating::Poor,
        Rating::Disappointed,
    ];

    /// Integer value as stored
    #[inline]
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::Neutral => "Neutral",
            Self::Poor => "Poor",
            Self::Disappointed => "Disappointed",
        }
    }

    /// Static emoji glyph
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::VeryGood => "😄",
            Self::Good => "🙂",
            Self::Neutral => "😐",
            Self::Poor => "🙁",
            Self::Disappointed => "😞",
        }
    }

    /// Noto emoji code point used to locate the animation resource
    pub const fn animation_code(self) -> &'static str {
        match self {
            Self::VeryGood => "1f603",
            Self::Good => "1f642",
            Self::Neutral => "1f610",
            Self::Poor => "1f641",
            Self::Disappointed => "1f61e",
        }
    }

    /// Label shown for this option in the submission form, e.g. "😄 Very Good"
    pub fn option_label(self) -> String {
        format!("{} {}", self.glyph(), self.label())
    }
}

impl TryFrom<i32> for Rating {
    type Error = InvalidRating;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Disappointed),
            2 => Ok(Self::Poor),
            3 => Ok(Self::Neutral),
            4 => Ok(Self::Good),
            5 => Ok(Self::VeryGood),
            other => Err(InvalidRating(other)),
        }
    }
}

impl From<Rating> for i32 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Glyph for a raw stored value; anything unrecognised renders as Neutral
pub fn fallback_glyph(value: Option<i32>) -> &'static str {
    value
        .and_then(|v| Rating::try_from(v).ok())
        .unwrap_or(Rating::Neutral)
        .glyph()
}
