//! Error handling utilities for repositories

use lumen_core::error::DomainError;
use lumen_core::value_objects::Snowflake;
use sqlx::Error as SqlxError;

/// Convert a SQLx error on a pool statement to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Convert a serialization failure on a JSON column to DomainError
pub fn map_json_error(e: serde_json::Error) -> DomainError {
    DomainError::Internal(format!("message data serialization: {e}"))
}

/// Create a "message not found" error
pub fn message_not_found(id: Snowflake) -> DomainError {
    DomainError::MessageNotFound(id)
}
