//! # board-db
//!
//! Database layer implementing the feedback repository with PostgreSQL via SQLx.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use board_db::{create_pool, run_migrations, DatabaseConfig, PgFeedbackRepository};
//! use board_core::FeedbackRepository;
//!
//! async fn example(config: &board_common::DatabaseConfig) -> Result<(), sqlx::Error> {
//!     let pool = create_pool(&DatabaseConfig::from(config)).await?;
//!     run_migrations(&pool).await?;
//!     let repo = PgFeedbackRepository::new(pool);
//!     let latest = repo.recent(12).await;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, create_lazy_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::PgFeedbackRepository;
