//! Value objects - immutable types that represent domain concepts

mod comment;
mod rating;
mod snowflake;

pub use comment::{CommentPolicy, PRESET_COMMENTS};
pub use rating::{fallback_glyph, InvalidRating, Rating};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};

/// Number of records kept in a board's display window
pub const DEFAULT_WINDOW_SIZE: usize = 12;

/// Default upper bound on records returned by one recent-feedback read
pub const MAX_PAGE_SIZE: usize = 50;
