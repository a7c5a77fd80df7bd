/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness violation (duplicate key)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Rejected input, including illegal order-status transitions
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Map a sqlx error, turning unique-constraint violations into
    /// `Conflict` so callers can render them as 409s.
    pub(crate) fn from_sqlx(err: sqlx::Error, conflict_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
                return Self::Conflict(conflict_msg.to_string());
            }
        }
        Self::Database(err)
    }
}

impl From<StorageError> for aria_core::AriaError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { entity, id } => aria_core::AriaError::NotFound { entity, id },
            StorageError::Conflict(msg) => aria_core::AriaError::Duplicate(msg),
            StorageError::InvalidInput(msg) => aria_core::AriaError::InvalidInput(msg),
            other => aria_core::AriaError::storage(other.to_string()),
        }
    }
}
