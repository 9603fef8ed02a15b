//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in board-core.

mod error;
mod feedback;

pub use feedback::PgFeedbackRepository;
