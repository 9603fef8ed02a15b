//! Repository and publisher traits (ports)

mod publisher;
mod repositories;

pub use publisher::EventPublisher;
pub use repositories::{FeedbackRepository, RepoResult};
