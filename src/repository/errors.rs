use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const FOREIGN_KEY_FAILED: &str = "FOREIGN KEY constraint failed";

/// Failures surfaced by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    /// A uniqueness constraint rejected the write.
    #[error("conflicting record: {0}")]
    Conflict(String),
    /// The candidate short code is already assigned to another recipe.
    #[error("short code already taken")]
    ShortCodeTaken,
    /// A foreign key rejected the write (missing target or restricted delete).
    #[error("reference violation: {0}")]
    ReferenceViolation(String),
    #[error("storage call cancelled")]
    Cancelled,
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(value: DieselError) -> Self {
        match value {
            DieselError::NotFound => RepositoryError::NotFound,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                RepositoryError::Conflict(info.message().to_string())
            }
            DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                RepositoryError::ReferenceViolation(info.message().to_string())
            }
            // SQLite reports foreign key failures without an extended code.
            DieselError::DatabaseError(DatabaseErrorKind::Unknown, info)
                if info.message().starts_with(FOREIGN_KEY_FAILED) =>
            {
                RepositoryError::ReferenceViolation(info.message().to_string())
            }
            other => RepositoryError::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_diesel_not_found() {
        assert!(matches!(
            RepositoryError::from(DieselError::NotFound),
            RepositoryError::NotFound
        ));
    }

    #[test]
    fn maps_unique_violation_to_conflict() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("UNIQUE constraint failed: tags.name".to_string()),
        );

        match RepositoryError::from(err) {
            RepositoryError::Conflict(message) => assert!(message.contains("tags.name")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn maps_unclassified_sqlite_foreign_key_failure() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("FOREIGN KEY constraint failed".to_string()),
        );

        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::ReferenceViolation(_)
        ));
    }

    #[test]
    fn other_unknown_errors_stay_database_errors() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::Unknown,
            Box::new("CHECK constraint failed: subscriptions".to_string()),
        );

        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn maps_foreign_key_violation() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::ForeignKeyViolation,
            Box::new("FOREIGN KEY constraint failed".to_string()),
        );

        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::ReferenceViolation(_)
        ));
    }
}
