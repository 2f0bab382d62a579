use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use authmodel_core::{
    ModelReader, ReadModelError, ReadModelRequest, ReadModelResponse, ReadModelResult,
    SqliteBackend, StorageError,
};
use tracing::{info_span, warn};

use super::super::args::ReadArgs;
use crate::exit_codes::SUCCESS;

pub async fn run(args: ReadArgs) -> anyhow::Result<i32> {
    let mut config = args.store.config();
    if args.timeout_secs.is_some() {
        config = config.with_read_timeout_secs(args.timeout_secs);
    }

    let backend = SqliteBackend::open_existing(&config).with_context(|| {
        format!(
            "failed to open model store at {}",
            config.database_path.display()
        )
    })?;
    let reader = ModelReader::new(
        Arc::new(backend),
        info_span!("read_model", store_id = %args.store_id),
    );

    let mut request = ReadModelRequest::new(&args.store_id);
    if let Some(model_id) = &args.model_id {
        request = request.with_model_id(model_id);
    }

    match read_with_deadline(&reader, &request, config.read_timeout()).await {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(SUCCESS)
        }
        Err(e) => {
            warn!(store_id = %args.store_id, error = %e, "read failed");
            eprintln!("error: {e}");
            Ok(e.exit_code())
        }
    }
}

/// Run the read under an optional caller deadline. An elapsed deadline is
/// reported as a storage failure, like one observed by the backend.
async fn read_with_deadline(
    reader: &ModelReader,
    request: &ReadModelRequest,
    limit: Option<Duration>,
) -> ReadModelResult<ReadModelResponse> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, reader.execute(request))
            .await
            .unwrap_or(Err(ReadModelError::Storage(StorageError::DeadlineExceeded))),
        None => reader.execute(request).await,
    }
}
