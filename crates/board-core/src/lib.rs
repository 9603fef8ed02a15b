//! # board-core
//!
//! Domain layer for the feedback board: the feedback entity, rating table,
//! comment policy, repository traits, and domain events.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::Feedback;
pub use error::DomainError;
pub use events::{DomainEvent, FeedbackCreatedEvent};
pub use traits::{EventPublisher, FeedbackRepository, RepoResult};
pub use value_objects::{
    fallback_glyph, CommentPolicy, InvalidRating, Rating, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, DEFAULT_WINDOW_SIZE, MAX_PAGE_SIZE, PRESET_COMMENTS,
};
