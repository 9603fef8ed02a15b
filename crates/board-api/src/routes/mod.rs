//! Route definitions
//!
//! Feedback routes are mounted under /api/v1; health probes are served both
//! at the root and under /api/v1.

use axum::{routing::get, Router};

use crate::handlers::{feedback, health};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(feedback_routes())
        .merge(health_routes())
}

/// Feedback routes
fn feedback_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/feedback",
            get(feedback::list_feedback).post(feedback::create_feedback),
        )
        .route("/feedback/options", get(feedback::feedback_options))
}
