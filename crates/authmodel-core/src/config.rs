//! Store configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// SQLite busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Deadline applied by callers around a read. `None` means no deadline.
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,
}

fn default_database_path() -> PathBuf {
    PathBuf::from("authmodel.db")
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            read_timeout_secs: None,
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `AUTHMODEL_DB_PATH` | SQLite database path |
    /// | `AUTHMODEL_BUSY_TIMEOUT_MS` | SQLite busy timeout |
    /// | `AUTHMODEL_READ_TIMEOUT_SECS` | Read deadline |
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var_os("AUTHMODEL_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            busy_timeout_ms: std::env::var("AUTHMODEL_BUSY_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(default_busy_timeout_ms),
            read_timeout_secs: std::env::var("AUTHMODEL_READ_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok()),
        }
    }

    /// Set the database path.
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Set the busy timeout.
    pub fn with_busy_timeout_ms(mut self, ms: u64) -> Self {
        self.busy_timeout_ms = ms;
        self
    }

    /// Set the read deadline.
    pub fn with_read_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.read_timeout_secs = secs;
        self
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}
