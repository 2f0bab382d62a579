//! Error types for authorization model reads.

use crate::storage::StorageError;

/// Errors returned by [`ModelReader::execute`](crate::ModelReader::execute).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ReadModelError {
    /// The store holds no model under the requested id.
    #[error("authorization model '{model_id}' not found")]
    AuthorizationModelNotFound { model_id: String },

    /// Any other storage failure. The cause is kept as the source.
    #[error("storage operation failed: {0}")]
    Storage(#[source] StorageError),
}

impl ReadModelError {
    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AuthorizationModelNotFound { .. } => 1,
            Self::Storage(cause) if cause.is_transient() => 5,
            Self::Storage(_) => 6,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AuthorizationModelNotFound { .. })
    }
}

/// Result type for model reads.
pub type ReadModelResult<T> = Result<T, ReadModelError>;
