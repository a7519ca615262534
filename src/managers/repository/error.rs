use thiserror::Error;

/// Error types for repository/database operations
#[derive(Error, Debug)]
pub(crate) enum RepositoryError {
    /// Database error - wraps all SeaORM errors
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    /// Record not found error
    #[error("Record not found: {0}")]
    NotFound(String),
}

/// Convenient Result type alias for RepositoryError
pub(crate) type Result<T> = std::result::Result<T, RepositoryError>;
