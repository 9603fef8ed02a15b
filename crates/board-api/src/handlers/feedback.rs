//! Feedback handlers

use axum::{extract::State, Json};
use board_service::{
    CreateFeedbackRequest, FeedbackOptionsResponse, FeedbackResponse, FeedbackService,
};

use crate::extractors::{RecentLimit, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Submit feedback
///
/// POST /feedback
pub async fn create_feedback(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateFeedbackRequest>,
) -> ApiResult<Created<Json<FeedbackResponse>>> {
    let service = FeedbackService::new(state.service_context());
    let response = service.submit(request).await?;
    Ok(Created(Json(response)))
}

/// Most recent feedback, newest first
///
/// GET /feedback?limit=n
pub async fn list_feedback(
    State(state): State<AppState>,
    RecentLimit(limit): RecentLimit,
) -> ApiResult<Json<Vec<FeedbackResponse>>> {
    let service = FeedbackService::new(state.service_context());
    let records = service.recent(limit).await?;
    Ok(Json(records))
}

/// Preset comments and rating choices
///
/// GET /feedback/options
pub async fn feedback_options(State(state): State<AppState>) -> Json<FeedbackOptionsResponse> {
    Json(FeedbackService::new(state.service_context()).options())
}
