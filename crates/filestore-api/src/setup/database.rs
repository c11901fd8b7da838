//! Metadata store connection.

use anyhow::{Context, Result};
use filestore_core::Config;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::path::PathBuf;
use std::time::Duration;

/// Workspace `migrations/`, resolved from this crate's manifest.
fn migrations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("migrations")
}

/// Open the pool and bring the `stored_files` schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .connect(config.database_url())
        .await
        .context("Failed to connect to the metadata database")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        acquire_timeout_secs = config.db_timeout_seconds(),
        "Metadata database pool ready"
    );

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &PgPool) -> Result<()> {
    let dir = migrations_dir();
    let migrator = Migrator::new(dir.clone())
        .await
        .with_context(|| format!("Failed to load migrations from {}", dir.display()))?;

    let start = std::time::Instant::now();
    migrator
        .run(pool)
        .await
        .context("Failed to apply metadata schema migrations")?;

    tracing::info!(
        migrations = migrator.iter().count(),
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Metadata schema up to date"
    );
    Ok(())
}
