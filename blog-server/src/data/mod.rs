pub mod category_repository;
pub mod post_repository;
pub mod user_repository;

use crate::domain::error::DomainError;
use tracing::error;

/// Classifies a failed write: constraint violations become client errors,
/// everything else is internal.
pub(crate) fn write_error(
    err: sqlx::Error,
    on_conflict: impl FnOnce() -> DomainError,
    on_missing_reference: impl FnOnce() -> DomainError,
) -> DomainError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => on_conflict(),
        Some(db) if db.is_foreign_key_violation() => on_missing_reference(),
        _ => {
            error!("database write failed: {}", err);
            DomainError::Internal(format!("database error: {}", err))
        }
    }
}

pub(crate) fn read_error(err: sqlx::Error) -> DomainError {
    error!("database read failed: {}", err);
    DomainError::Internal(format!("database error: {}", err))
}
