//! Axum extractors for request handling

mod limit;
mod validated;

pub use limit::{RecentLimit, MAX_LIMIT};
pub use validated::ValidatedJson;
