//! SQLite schema for authorization model storage.
//!
//! Tables:
//! - `authorization_models`: Immutable model documents, one row per (store, model id)

/// DDL for authorization model storage.
///
/// Schema version: 1
pub const MODEL_SCHEMA: &str = r#"
-- Model documents (immutable after insert); seq orders writes within a store
CREATE TABLE IF NOT EXISTS authorization_models (
    seq              INTEGER PRIMARY KEY AUTOINCREMENT,
    store_id         TEXT NOT NULL,
    model_id         TEXT NOT NULL,
    schema_version   TEXT NOT NULL,
    model_json       TEXT NOT NULL,
    inserted_at      TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(store_id, model_id)
);

CREATE INDEX IF NOT EXISTS idx_authorization_models_store_seq
    ON authorization_models(store_id, seq);
"#;
