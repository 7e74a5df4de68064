//! tododeck
//!
//! Local todo manager: personal task records with statuses, priorities, due
//! dates, and assignment, behind persisted sort/filter preferences and a
//! local account registry.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tododeck::cli::{Cli, commands};
use tododeck::config::Config;
use tododeck::identity::LocalIdentity;
use tododeck::storage::{SqliteStorage, Storage};
use tododeck::store::TodoStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "tododeck=debug"
    } else {
        "tododeck=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let db_path = cli.database.clone().unwrap_or(config.storage.db_path);
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    debug!(path = %db_path.display(), "opening storage");

    let storage: Arc<dyn Storage> = Arc::new(SqliteStorage::open(&db_path)?);
    let mut store = TodoStore::open(Arc::clone(&storage))?;
    let identity = LocalIdentity::new(storage);

    commands::run(cli.command, &mut store, &identity).await
}
