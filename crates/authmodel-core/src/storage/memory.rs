//! In-memory model storage.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use super::{AuthorizationModelReadBackend, StorageError, StorageResult};
use crate::model::AuthorizationModel;

/// Process-local model storage. Write order defines the latest model of a store.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stores: RwLock<HashMap<String, Vec<AuthorizationModel>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a model. Model ids are unique per store.
    pub fn write_authorization_model(
        &self,
        store_id: &str,
        model: AuthorizationModel,
    ) -> StorageResult<()> {
        if store_id.is_empty() {
            return Err(StorageError::invalid_argument("store id must not be empty"));
        }
        if model.id.is_empty() {
            return Err(StorageError::invalid_argument("model id must not be empty"));
        }

        let mut stores = self
            .stores
            .write()
            .map_err(|_| StorageError::Database("memory store lock poisoned".to_string()))?;
        let models = stores.entry(store_id.to_string()).or_default();
        if models.iter().any(|m| m.id == model.id) {
            return Err(StorageError::invalid_argument(format!(
                "model '{}' already exists in store '{}'",
                model.id, store_id
            )));
        }

        debug!(store_id = %store_id, model_id = %model.id, "stored authorization model");
        models.push(model);
        Ok(())
    }
}

#[async_trait]
impl AuthorizationModelReadBackend for MemoryBackend {
    async fn read_authorization_model(
        &self,
        store_id: &str,
        model_id: &str,
    ) -> StorageResult<AuthorizationModel> {
        if store_id.is_empty() {
            return Err(StorageError::invalid_argument("store id must not be empty"));
        }

        let stores = self
            .stores
            .read()
            .map_err(|_| StorageError::Database("memory store lock poisoned".to_string()))?;
        let models = stores.get(store_id).ok_or(StorageError::NotFound)?;

        let found = if model_id.is_empty() {
            models.last()
        } else {
            models.iter().find(|m| m.id == model_id)
        };
        found.cloned().ok_or(StorageError::NotFound)
    }
}
