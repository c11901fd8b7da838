//! Storage setup and initialization

use anyhow::{Context, Result};
use filestore_core::Config;
use filestore_db::FileRecordRepository;
use filestore_storage::{create_storage, StorageFacade};
use std::sync::Arc;

/// Build the storage backend selected by configuration.
pub async fn setup_storage(
    config: &Config,
    repository: Arc<dyn FileRecordRepository>,
) -> Result<StorageFacade> {
    tracing::info!(storage_type = %config.storage_type(), "Initializing storage backend...");

    let storage = create_storage(config, repository)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        "Storage backend initialized successfully"
    );

    Ok(storage)
}
