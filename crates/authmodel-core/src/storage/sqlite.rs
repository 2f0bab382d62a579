//! SqliteBackend: SQLite-backed authorization model storage.
//!
//! Models are written once and never updated. The latest model of a store is
//! the one with the highest insertion sequence.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use rusqlite::{params, Connection, ErrorCode, OpenFlags};
use tracing::debug;

use super::schema::MODEL_SCHEMA;
use super::{AuthorizationModelReadBackend, StorageError, StorageResult};
use crate::config::StoreConfig;
use crate::model::AuthorizationModel;

/// SQLite-backed model storage.
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend").finish_non_exhaustive()
    }
}

impl SqliteBackend {
    /// Open a file-backed store.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open the store described by `config`.
    pub fn from_config(config: &StoreConfig) -> StorageResult<Self> {
        let conn = Connection::open(&config.database_path)?;
        conn.busy_timeout(config.busy_timeout())?;
        Self::from_connection(conn)
    }

    /// Open an existing store for reading. Never creates the file or touches the schema.
    pub fn open_existing(config: &StoreConfig) -> StorageResult<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(&config.database_path, flags)?;
        conn.busy_timeout(config.busy_timeout())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Create store from existing connection.
    pub fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_connection(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn init_connection(conn: &Connection) -> StorageResult<()> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        // WAL mode for file-backed DBs (no-op for in-memory)
        let _ = conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()));
        conn.execute_batch(MODEL_SCHEMA)?;
        Ok(())
    }

    /// Store a model. Fails with `InvalidArgument` if the store already holds its id.
    pub fn write_authorization_model(
        &self,
        store_id: &str,
        model: &AuthorizationModel,
    ) -> StorageResult<()> {
        if store_id.is_empty() {
            return Err(StorageError::invalid_argument("store id must not be empty"));
        }
        if model.id.is_empty() {
            return Err(StorageError::invalid_argument("model id must not be empty"));
        }

        let model_json = serde_json::to_string(model)?;
        let conn = lock(&self.conn)?;
        let inserted = conn.execute(
            r#"
            INSERT INTO authorization_models (store_id, model_id, schema_version, model_json)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![store_id, model.id, model.schema_version, model_json],
        );

        match inserted {
            Ok(_) => {
                debug!(store_id = %store_id, model_id = %model.id, "stored authorization model");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(StorageError::invalid_argument(format!(
                    "model '{}' already exists in store '{}'",
                    model.id, store_id
                )))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Number of models stored for `store_id`.
    pub fn count_models(&self, store_id: &str) -> StorageResult<u32> {
        let conn = lock(&self.conn)?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM authorization_models WHERE store_id = ?1",
            params![store_id],
            |row| row.get(0),
        )?;
        u32::try_from(count).map_err(|_| StorageError::Corrupt {
            message: format!("model count out of range: {}", count),
        })
    }
}

#[async_trait]
impl AuthorizationModelReadBackend for SqliteBackend {
    async fn read_authorization_model(
        &self,
        store_id: &str,
        model_id: &str,
    ) -> StorageResult<AuthorizationModel> {
        if store_id.is_empty() {
            return Err(StorageError::invalid_argument("store id must not be empty"));
        }
        debug!(store_id = %store_id, model_id = %model_id, "reading authorization model");

        let conn = Arc::clone(&self.conn);
        let store_id = store_id.to_string();
        let model_id = model_id.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = lock(&conn)?;
            read_model(&conn, &store_id, &model_id)
        })
        .await
        .map_err(|e| {
            if e.is_cancelled() {
                StorageError::Cancelled
            } else {
                StorageError::Database(format!("lookup task failed: {}", e))
            }
        })?
    }
}

fn lock(conn: &Mutex<Connection>) -> StorageResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| StorageError::Database("connection lock poisoned".to_string()))
}

fn read_model(conn: &Connection, store_id: &str, model_id: &str) -> StorageResult<AuthorizationModel> {
    let model_json: String = if model_id.is_empty() {
        conn.query_row(
            r#"
            SELECT model_json FROM authorization_models
            WHERE store_id = ?1
            ORDER BY seq DESC
            LIMIT 1
            "#,
            params![store_id],
            |row| row.get(0),
        )?
    } else {
        conn.query_row(
            r#"
            SELECT model_json FROM authorization_models
            WHERE store_id = ?1 AND model_id = ?2
            "#,
            params![store_id, model_id],
            |row| row.get(0),
        )?
    };

    Ok(serde_json::from_str(&model_json)?)
}
