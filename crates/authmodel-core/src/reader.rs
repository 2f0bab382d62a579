//! Authorization model reads.
//!
//! Flow:
//! 1. Look up (store id, model id) in the storage backend, once
//! 2. Return the stored model unchanged
//! 3. Map the storage absence sentinel to `AuthorizationModelNotFound`
//! 4. Wrap every other storage error as `Storage`, cause preserved

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{Instrument, Span};

use crate::error::{ReadModelError, ReadModelResult};
use crate::model::AuthorizationModel;
use crate::storage::{AuthorizationModelReadBackend, StorageError};

/// Request for one authorization model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadModelRequest {
    /// Store id, forwarded to storage as given.
    pub store_id: String,

    /// Model id. Absent or empty leaves the choice to the backend.
    #[serde(default)]
    pub model_id: Option<String>,
}

impl ReadModelRequest {
    pub fn new(store_id: impl Into<String>) -> Self {
        Self {
            store_id: store_id.into(),
            model_id: None,
        }
    }

    /// Set the model id.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    /// Model id as forwarded to storage (empty when absent).
    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or_default()
    }
}

/// Successful read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadModelResponse {
    pub authorization_model: AuthorizationModel,
}

/// Reads authorization models from a storage backend.
///
/// Holds no mutable state; share it freely across tasks.
pub struct ModelReader {
    backend: Arc<dyn AuthorizationModelReadBackend>,
    span: Span,
}

impl ModelReader {
    /// Create a reader. Backend diagnostics are recorded inside `span`.
    pub fn new(backend: Arc<dyn AuthorizationModelReadBackend>, span: Span) -> Self {
        Self { backend, span }
    }

    /// Read the model named by `request`.
    ///
    /// Dropping the returned future drops the storage lookup with it, so a
    /// caller-side deadline reaches the backend unchanged.
    pub async fn execute(&self, request: &ReadModelRequest) -> ReadModelResult<ReadModelResponse> {
        let model_id = request.model_id();
        let result = self
            .backend
            .read_authorization_model(&request.store_id, model_id)
            .instrument(self.span.clone())
            .await;

        match result {
            Ok(authorization_model) => Ok(ReadModelResponse {
                authorization_model,
            }),
            Err(StorageError::NotFound) => Err(ReadModelError::AuthorizationModelNotFound {
                model_id: model_id.to_string(),
            }),
            Err(cause) => Err(ReadModelError::Storage(cause)),
        }
    }
}

impl std::fmt::Debug for ModelReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelReader")
            .field("span", &self.span)
            .finish_non_exhaustive()
    }
}
