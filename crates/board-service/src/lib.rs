//! # board-service
//!
//! Application layer: request DTOs, feedback submission and queries.

pub mod dto;
pub mod services;

pub use dto::{
    CreateFeedbackRequest, FeedbackOptionsResponse, FeedbackResponse, HealthChecks,
    HealthResponse, RatingOption, ReadinessResponse, RecentQuery,
};
pub use services::{
    FeedbackService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult,
};
