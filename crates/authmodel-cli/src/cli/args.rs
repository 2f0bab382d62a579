use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use authmodel_core::StoreConfig;

#[derive(Parser)]
#[command(
    name = "authmodel",
    version,
    about = "Read and write authorization models in a local model store"
)]
pub struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print one authorization model as JSON
    Read(ReadArgs),
    /// Store an authorization model from a JSON file
    Write(WriteArgs),
    Version,
}

#[derive(Args, Clone, Debug)]
pub struct StoreArgs {
    /// SQLite database path (defaults to AUTHMODEL_DB_PATH, then authmodel.db)
    #[arg(long)]
    pub db: Option<PathBuf>,
}

impl StoreArgs {
    pub fn config(&self) -> StoreConfig {
        let config = StoreConfig::from_env();
        match &self.db {
            Some(path) => config.with_database_path(path),
            None => config,
        }
    }
}

#[derive(Args, Clone, Debug)]
pub struct ReadArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Store id
    #[arg(long = "store")]
    pub store_id: String,

    /// Model id (omit for the latest model of the store)
    #[arg(long = "model")]
    pub model_id: Option<String>,

    /// Give up after this many seconds (overrides AUTHMODEL_READ_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

#[derive(Args, Clone, Debug)]
pub struct WriteArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Store id
    #[arg(long = "store")]
    pub store_id: String,

    /// Model JSON file; an empty or missing `id` gets a generated one
    #[arg(long)]
    pub file: PathBuf,
}
