use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl RepositoryError {
    /// Errors worth retrying: the pool or the database may recover, while
    /// missing rows and constraint failures will not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionError(_) | RepositoryError::DatabaseError(_)
        )
    }

    /// Whether the error was caused by a unique index.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, RepositoryError::ConstraintViolation(message) if message.starts_with("Unique"))
    }
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,

            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => RepositoryError::ConstraintViolation(
                        format!("Unique constraint violation: {message}"),
                    ),
                    DatabaseErrorKind::ForeignKeyViolation => RepositoryError::ConstraintViolation(
                        format!("Foreign key constraint violation: {message}"),
                    ),
                    DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
                        RepositoryError::ConstraintViolation(message)
                    }
                    _ => RepositoryError::DatabaseError(message),
                }
            }

            DieselError::SerializationError(e) | DieselError::DeserializationError(e) => {
                RepositoryError::ValidationError(format!("Serialization error: {e}"))
            }

            DieselError::QueryBuilderError(e) => {
                RepositoryError::ValidationError(format!("Query builder error: {e}"))
            }

            DieselError::RollbackTransaction
            | DieselError::AlreadyInTransaction
            | DieselError::NotInTransaction
            | DieselError::BrokenTransactionManager => {
                RepositoryError::DatabaseError(format!("Transaction error: {err}"))
            }

            _ => RepositoryError::Unexpected(format!("Unexpected diesel error: {err}")),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(format!("Connection error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connection_and_database_errors_are_transient() {
        assert!(RepositoryError::ConnectionError("pool".into()).is_transient());
        assert!(RepositoryError::DatabaseError("locked".into()).is_transient());
        assert!(!RepositoryError::NotFound.is_transient());
        assert!(!RepositoryError::ConstraintViolation("x".into()).is_transient());
    }

    #[test]
    fn diesel_not_found_maps_to_not_found() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
    }
}
