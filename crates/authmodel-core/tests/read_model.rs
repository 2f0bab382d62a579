//! Integration tests for ModelReader against the shipped backends.
//!
//! Covers the read scenarios (found / missing / storage failure), idempotence,
//! concurrent reads, caller deadlines and log scoping through the injected span.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use authmodel_core::{
    AuthorizationModel, AuthorizationModelReadBackend, MemoryBackend, ModelReader,
    ReadModelError, ReadModelRequest, SqliteBackend, StorageError, StorageResult, TypeDefinition,
};
use serde_json::json;
use tracing::Span;
use tracing_subscriber::fmt::MakeWriter;

fn model(id: &str) -> AuthorizationModel {
    AuthorizationModel::new(id, "1.1")
        .with_type(TypeDefinition::new("user"))
        .with_type(TypeDefinition::new("document").with_relation("viewer", json!({"this": {}})))
}

fn memory_reader() -> (Arc<MemoryBackend>, ModelReader) {
    let backend = Arc::new(MemoryBackend::new());
    let reader = ModelReader::new(backend.clone(), Span::none());
    (backend, reader)
}

/// Backend that fails every lookup with a connectivity error.
struct UnreachableBackend;

#[async_trait]
impl AuthorizationModelReadBackend for UnreachableBackend {
    async fn read_authorization_model(
        &self,
        _store_id: &str,
        _model_id: &str,
    ) -> StorageResult<AuthorizationModel> {
        Err(StorageError::Database("connection refused".to_string()))
    }
}

/// Backend that never answers; records whether its lookup future was dropped.
struct StalledBackend {
    dropped: Arc<AtomicBool>,
}

struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl AuthorizationModelReadBackend for StalledBackend {
    async fn read_authorization_model(
        &self,
        _store_id: &str,
        _model_id: &str,
    ) -> StorageResult<AuthorizationModel> {
        let _flag = DropFlag(self.dropped.clone());
        std::future::pending::<()>().await;
        Err(StorageError::NotFound)
    }
}

#[tokio::test]
async fn test_read_existing_model() {
    let (backend, reader) = memory_reader();
    backend.write_authorization_model("store-1", model("model-A")).unwrap();

    let response = reader
        .execute(&ReadModelRequest::new("store-1").with_model_id("model-A"))
        .await
        .expect("read failed");
    assert_eq!(response.authorization_model, model("model-A"));
}

#[tokio::test]
async fn test_read_missing_model() {
    let (backend, reader) = memory_reader();
    backend.write_authorization_model("store-1", model("model-A")).unwrap();

    let err = reader
        .execute(&ReadModelRequest::new("store-1").with_model_id("missing"))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ReadModelError::AuthorizationModelNotFound {
            model_id: "missing".to_string()
        }
    );
    assert_eq!(err.exit_code(), 1);
}

#[tokio::test]
async fn test_connectivity_error_is_storage_failure() {
    let reader = ModelReader::new(Arc::new(UnreachableBackend), Span::none());

    for model_id in ["model-A", "missing", ""] {
        let err = reader
            .execute(&ReadModelRequest::new("store-1").with_model_id(model_id))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ReadModelError::Storage(StorageError::Database("connection refused".to_string()))
        );
    }
}

#[tokio::test]
async fn test_backend_rejection_passes_through() {
    let (_backend, reader) = memory_reader();
    let err = reader
        .execute(&ReadModelRequest::new("").with_model_id("model-A"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ReadModelError::Storage(StorageError::InvalidArgument { .. })
    ));
}

#[tokio::test]
async fn test_sqlite_scenarios() {
    let backend = SqliteBackend::memory().unwrap();
    backend.write_authorization_model("store-1", &model("model-A")).unwrap();
    backend.write_authorization_model("store-1", &model("model-B")).unwrap();
    let reader = ModelReader::new(Arc::new(backend), Span::none());

    let found = reader
        .execute(&ReadModelRequest::new("store-1").with_model_id("model-A"))
        .await
        .unwrap();
    assert_eq!(found.authorization_model, model("model-A"));

    let latest = reader
        .execute(&ReadModelRequest::new("store-1"))
        .await
        .unwrap();
    assert_eq!(latest.authorization_model.id, "model-B");

    let missing = reader
        .execute(&ReadModelRequest::new("store-1").with_model_id("missing"))
        .await;
    assert_eq!(
        missing,
        Err(ReadModelError::AuthorizationModelNotFound {
            model_id: "missing".to_string()
        })
    );
}

#[tokio::test]
async fn test_repeated_reads_are_identical() {
    let backend = SqliteBackend::memory().unwrap();
    backend.write_authorization_model("store-1", &model("model-A")).unwrap();
    let reader = ModelReader::new(Arc::new(backend), Span::none());

    for request in [
        ReadModelRequest::new("store-1").with_model_id("model-A"),
        ReadModelRequest::new("store-1").with_model_id("missing"),
    ] {
        let first = reader.execute(&request).await;
        let second = reader.execute(&request).await;
        assert_eq!(first, second);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reads_are_independent() {
    let backend = SqliteBackend::memory().unwrap();
    for i in 0..16 {
        backend
            .write_authorization_model(&format!("store-{i}"), &model(&format!("model-{i}")))
            .unwrap();
    }
    let reader = Arc::new(ModelReader::new(Arc::new(backend), Span::none()));

    let mut handles = Vec::new();
    for i in 0..32 {
        let reader = reader.clone();
        handles.push(tokio::spawn(async move {
            // Odd tasks ask for a model id that does not exist.
            let model_id = if i % 2 == 0 {
                format!("model-{}", i / 2)
            } else {
                format!("absent-{i}")
            };
            let store_id = format!("store-{}", i / 2);
            let result = reader
                .execute(&ReadModelRequest::new(store_id).with_model_id(model_id.clone()))
                .await;
            (i, model_id, result)
        }));
    }

    for handle in handles {
        let (i, model_id, result) = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(result.unwrap().authorization_model.id, model_id);
        } else {
            assert_eq!(
                result.unwrap_err(),
                ReadModelError::AuthorizationModelNotFound { model_id }
            );
        }
    }
}

#[tokio::test]
async fn test_caller_deadline_drops_lookup() {
    let dropped = Arc::new(AtomicBool::new(false));
    let reader = ModelReader::new(
        Arc::new(StalledBackend {
            dropped: dropped.clone(),
        }),
        Span::none(),
    );

    let request = ReadModelRequest::new("store-1").with_model_id("model-A");
    let outcome = tokio::time::timeout(Duration::from_millis(20), reader.execute(&request)).await;

    assert!(outcome.is_err(), "expected the deadline to elapse");
    assert!(dropped.load(Ordering::SeqCst), "lookup future was not dropped");
}

#[derive(Clone)]
struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MockWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[tokio::test]
async fn test_backend_events_are_scoped_to_injected_span() {
    let writer = MockWriter {
        buf: Arc::new(Mutex::new(Vec::new())),
    };
    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .json()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let backend = SqliteBackend::memory().unwrap();
    backend.write_authorization_model("store-1", &model("model-A")).unwrap();
    let reader = ModelReader::new(
        Arc::new(backend),
        tracing::info_span!("model_reader", component = "test"),
    );
    reader
        .execute(&ReadModelRequest::new("store-1").with_model_id("model-A"))
        .await
        .unwrap();

    let output = String::from_utf8(writer.buf.lock().unwrap().clone()).unwrap();
    let lookup_event = output
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .find(|v| v["fields"]["message"] == "reading authorization model")
        .expect("lookup event missing");

    assert_eq!(lookup_event["span"]["name"], "model_reader");
    assert_eq!(lookup_event["fields"]["store_id"], "store-1");
}
