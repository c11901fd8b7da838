//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use filestore_core::Config;
use filestore_db::PgFileRecordRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!(
        environment = %config.environment(),
        storage_type = %config.storage_type(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let repository = Arc::new(PgFileRecordRepository::new(pool));

    // Backend construction failure aborts startup
    let storage = storage::setup_storage(&config, repository).await?;

    let state = Arc::new(AppState::new(config.clone(), storage));

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router))
}
