//! Authorization model retrieval.
//!
//! This crate provides:
//!
//! - [`ModelReader`]: reads one authorization model for a store and maps
//!   storage outcomes into typed results
//! - [`AuthorizationModelReadBackend`]: the read-only storage capability the
//!   reader depends on, with a single [`StorageError::NotFound`] sentinel
//! - In-memory and SQLite backends
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use authmodel_core::{ModelReader, ReadModelRequest, SqliteBackend, StoreConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let backend = SqliteBackend::from_config(&StoreConfig::from_env())?;
//! let reader = ModelReader::new(Arc::new(backend), tracing::info_span!("read_model"));
//!
//! let response = reader
//!     .execute(&ReadModelRequest::new("store-1").with_model_id("model-A"))
//!     .await?;
//! println!("{}", response.authorization_model.id);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `AUTHMODEL_DB_PATH` | SQLite database path (default: `authmodel.db`) |
//! | `AUTHMODEL_BUSY_TIMEOUT_MS` | SQLite busy timeout in milliseconds (default: 5000) |
//! | `AUTHMODEL_READ_TIMEOUT_SECS` | Caller-side read deadline in seconds (default: none) |

pub mod config;
pub mod error;
pub mod model;
pub mod reader;
pub mod storage;

pub use config::StoreConfig;
pub use error::{ReadModelError, ReadModelResult};
pub use model::{AuthorizationModel, TypeDefinition};
pub use reader::{ModelReader, ReadModelRequest, ReadModelResponse};
pub use storage::{
    AuthorizationModelReadBackend, MemoryBackend, SqliteBackend, StorageError, StorageResult,
    MODEL_SCHEMA,
};
