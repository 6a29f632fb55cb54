//! Mapping of storage errors onto application errors

use application::ApplicationError;

use super::connection::DatabaseError;

/// Map a storage error to `ApplicationError::Persistence`
pub(crate) fn map_db_error(e: impl Into<DatabaseError>) -> ApplicationError {
    ApplicationError::Persistence(e.into().to_string())
}

/// Map a failed blocking task to `ApplicationError::Internal`
pub(crate) fn map_join_error(e: tokio::task::JoinError) -> ApplicationError {
    ApplicationError::Internal(format!("Database task failed: {e}"))
}
