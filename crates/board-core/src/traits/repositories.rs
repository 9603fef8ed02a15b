//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::Feedback;
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Feedback Repository
// ============================================================================

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a new record and return it as stored
    async fn create(&self, feedback: &Feedback) -> RepoResult<Feedback>;

    /// Most recent records ordered by `created_at` descending
    async fn recent(&self, limit: i64) -> RepoResult<Vec<Feedback>>;

    /// Total number of stored records
    async fn count(&self) -> RepoResult<i64>;
}
