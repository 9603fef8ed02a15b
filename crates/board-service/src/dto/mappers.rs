//! Entity to DTO mappers

use board_core::{Feedback, Rating, PRESET_COMMENTS};

use super::responses::{FeedbackOptionsResponse, FeedbackResponse, RatingOption};

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id.to_string(),
            name: feedback.name,
            comment: feedback.comment,
            emoji: feedback.emoji,
            created_at: feedback.created_at,
        }
    }
}

impl From<Rating> for RatingOption {
    fn from(rating: Rating) -> Self {
        Self {
            value: rating.value(),
            label: rating.label().to_string(),
            glyph: rating.glyph().to_string(),
            option_label: rating.option_label(),
            animation_code: rating.animation_code().to_string(),
        }
    }
}

impl Default for FeedbackOptionsResponse {
    fn default() -> Self {
        Self {
            presets: PRESET_COMMENTS.iter().map(ToString::to_string).collect(),
            ratings: Rating::ALL.into_iter().map(RatingOption::from).collect(),
        }
    }
}
