//! File operation error taxonomy.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;

/// File operation errors.
///
/// Ownership-check failures on mutation collapse not-found and forbidden into
/// [`FileError::NotFoundOrNotAuthorized`] to avoid leaking file existence.
#[derive(Debug, Error)]
pub enum FileError {
    /// Too many files in a single upload batch.
    #[error("maximum {limit} files allowed for upload at a time")]
    MaxFilesExceeded {
        /// The batch size limit.
        limit: usize,
    },

    /// Declared MIME type is outside the supported set.
    #[error("mime type {0} not supported for upload")]
    UnsupportedMimeType(String),

    /// No file record with the given id.
    #[error("file not found: {0}")]
    FileNotFound(Uuid),

    /// Caller is not the owner of the file.
    #[error("user {user_id} not authorized to view this file")]
    NotAuthorized {
        /// The rejected caller.
        user_id: String,
    },

    /// Either the file does not exist or the caller does not own it.
    #[error("either file not found or user not authorized for this file")]
    NotFoundOrNotAuthorized,

    /// No user registered under the given email.
    #[error("user with email {0} not found")]
    UserNotFound(String),

    /// Search requires at least one of name or file type.
    #[error("search params are invalid")]
    InvalidSearchParams,

    /// Object storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Persistence failure (including unique-constraint violations).
    #[error("repository error: {0}")]
    Repository(String),
}

impl FileError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
