//! Domain entities

mod feedback;

pub use feedback::Feedback;
