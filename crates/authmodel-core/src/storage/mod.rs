//! Storage capability for authorization models.
//!
//! The reader only depends on [`AuthorizationModelReadBackend`]. Backends
//! signal absence with exactly one variant, [`StorageError::NotFound`];
//! every other variant is an unclassified storage failure.

mod memory;
mod schema;
mod sqlite;

use async_trait::async_trait;

use crate::model::AuthorizationModel;

pub use memory::MemoryBackend;
pub use schema::MODEL_SCHEMA;
pub use sqlite::SqliteBackend;

/// Storage errors.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StorageError {
    /// No record exists for the requested key.
    #[error("not found")]
    NotFound,

    /// The backend rejected an identifier or payload.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The operation was cancelled before it completed.
    #[error("operation cancelled")]
    Cancelled,

    /// The caller's deadline expired.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// A stored record could not be decoded.
    #[error("corrupt record: {message}")]
    Corrupt { message: String },

    /// Database error.
    #[error("database error: {0}")]
    Database(String),
}

impl StorageError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::QueryReturnedNoRows => StorageError::NotFound,
            other => StorageError::Database(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Corrupt {
            message: e.to_string(),
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Read-only lookup of authorization models.
///
/// Implementations must be safe for concurrent use. An empty `model_id`
/// selects the most recently written model of the store, and is
/// [`StorageError::NotFound`] only when the store holds no model.
#[async_trait]
pub trait AuthorizationModelReadBackend: Send + Sync {
    async fn read_authorization_model(
        &self,
        store_id: &str,
        model_id: &str,
    ) -> StorageResult<AuthorizationModel>;
}
