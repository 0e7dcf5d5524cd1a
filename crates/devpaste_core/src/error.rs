//! Application error types for core storage and domain logic.
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    #[error("Paste id '{0}' already exists")]
    DuplicateId(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Paste not found")]
    NotFound,

    #[error("Incorrect password")]
    Unauthorized,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal,
}

impl AppError {
    /// Whether this error is a store/hashing failure rather than an expected
    /// user-facing outcome.
    ///
    /// # Returns
    /// `false` for [`AppError::NotFound`], [`AppError::Unauthorized`] and
    /// [`AppError::BadRequest`], `true` otherwise.
    pub fn is_persistence(&self) -> bool {
        !matches!(
            self,
            Self::NotFound | Self::Unauthorized | Self::BadRequest(_)
        )
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}
