//! Database models with SQLx `FromRow` derives

mod feedback;

pub use feedback::FeedbackModel;
