//! Feedback database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the `feedback` table
#[derive(Debug, Clone, FromRow)]
pub struct FeedbackModel {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub emoji: Option<i16>,
    pub created_at: DateTime<Utc>,
}
