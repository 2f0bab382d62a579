use anyhow::Context;
use authmodel_core::{AuthorizationModel, SqliteBackend};
use tracing::info;

use super::super::args::WriteArgs;
use crate::exit_codes::SUCCESS;

pub fn run(args: WriteArgs) -> anyhow::Result<i32> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let mut model: AuthorizationModel = serde_json::from_str(&raw)
        .with_context(|| format!("invalid model document {}", args.file.display()))?;
    if model.id.is_empty() {
        model.id = uuid::Uuid::new_v4().simple().to_string();
    }

    let config = args.store.config();
    let backend = SqliteBackend::from_config(&config).with_context(|| {
        format!(
            "failed to open model store at {}",
            config.database_path.display()
        )
    })?;
    backend
        .write_authorization_model(&args.store_id, &model)
        .with_context(|| format!("failed to store model in store '{}'", args.store_id))?;

    info!(store_id = %args.store_id, model_id = %model.id, "model written");
    println!("{}", model.id);
    Ok(SUCCESS)
}
