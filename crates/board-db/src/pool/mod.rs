//! Database connection pool management

mod postgres;

pub use postgres::{create_lazy_pool, create_pool, run_migrations, DatabaseConfig};

// Re-export PgPool for convenience
pub use sqlx::postgres::PgPool;
