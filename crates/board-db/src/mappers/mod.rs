//! Entity <-> model mappers

mod feedback;

pub use feedback::FeedbackInsert;
