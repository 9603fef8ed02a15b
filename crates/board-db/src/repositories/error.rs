//! Error handling utilities for repositories

use board_core::error::DomainError;
use board_core::Snowflake;
use sqlx::error::ErrorKind;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if matches!(db_err.kind(), ErrorKind::CheckViolation) {
            return DomainError::ValidationError(db_err.message().to_string());
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Map an INSERT failure, turning a primary key clash into a conflict
pub fn map_insert_error(e: SqlxError, id: Snowflake) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return DomainError::DuplicateFeedback(id);
        }
    }
    map_db_error(e)
}
