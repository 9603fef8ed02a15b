//! Feedback service
//!
//! Handles feedback submission and the "most recent" query.

use board_core::{DomainEvent, Feedback};
use chrono::Utc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{CreateFeedbackRequest, FeedbackOptionsResponse, FeedbackResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Feedback service
pub struct FeedbackService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedbackService<'a> {
    /// Create a new FeedbackService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store a new feedback record and announce it to live displays
    ///
    /// A failed announcement is logged; the record is still returned since it
    /// has been persisted.
    #[instrument(skip(self, request), fields(name = %request.name, emoji = ?request.emoji))]
    pub async fn submit(&self, request: CreateFeedbackRequest) -> ServiceResult<FeedbackResponse> {
        request.validate()?;

        let feedback = Feedback::new(
            self.ctx.generate_id(),
            request.name,
            request.comment,
            request.emoji,
            request.created_at.unwrap_or_else(Utc::now),
        );

        let stored = self.ctx.feedback_repo().create(&feedback).await?;

        info!(feedback_id = %stored.id, "Feedback created");

        let event = DomainEvent::feedback_created(stored.clone());
        match self.ctx.publisher().publish(&event).await {
            Ok(receivers) => {
                tracing::debug!(feedback_id = %stored.id, receivers, "Published FEEDBACK_CREATE");
            }
            Err(e) => {
                warn!(feedback_id = %stored.id, error = %e, "Failed to publish FEEDBACK_CREATE");
            }
        }

        Ok(FeedbackResponse::from(stored))
    }

    /// Most recent records, newest first
    ///
    /// `limit` defaults to the configured window size and is clamped to
    /// `1..=max_page_size`.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: Option<i64>) -> ServiceResult<Vec<FeedbackResponse>> {
        let limit = self.effective_limit(limit);
        let records = self.ctx.feedback_repo().recent(limit).await?;
        Ok(records.into_iter().map(FeedbackResponse::from).collect())
    }

    /// Preset comments and rating choices for the submission form
    pub fn options(&self) -> FeedbackOptionsResponse {
        FeedbackOptionsResponse::default()
    }

    fn effective_limit(&self, limit: Option<i64>) -> i64 {
        let board = self.ctx.board();
        let max = i64::try_from(board.max_page_size).unwrap_or(i64::MAX).max(1);
        let default = i64::try_from(board.window_size).unwrap_or(max);
        limit.unwrap_or(default).clamp(1, max)
    }
}
