//! Feedback entity <-> model mapper

use board_core::{Feedback, InvalidRating, Snowflake};
use chrono::{DateTime, Utc};

use crate::models::FeedbackModel;

impl From<FeedbackModel> for Feedback {
    fn from(model: FeedbackModel) -> Self {
        Feedback {
            id: Snowflake::new(model.id),
            name: model.name,
            comment: model.comment,
            emoji: model.emoji.map(i32::from),
            created_at: model.created_at,
        }
    }
}

/// Column values bound by the INSERT statement
#[derive(Debug)]
pub struct FeedbackInsert<'a> {
    pub id: i64,
    pub name: &'a str,
    pub comment: &'a str,
    pub emoji: Option<i16>,
    pub created_at: DateTime<Utc>,
}

impl<'a> TryFrom<&'a Feedback> for FeedbackInsert<'a> {
    type Error = InvalidRating;

    fn try_from(feedback: &'a Feedback) -> Result<Self, Self::Error> {
        let emoji = feedback
            .emoji
            .map(|value| i16::try_from(value).map_err(|_| InvalidRating(value)))
            .transpose()?;

        Ok(Self {
            id: feedback.id.into_inner(),
            name: &feedback.name,
            comment: &feedback.comment,
            emoji,
            created_at: feedback.created_at,
        })
    }
}
