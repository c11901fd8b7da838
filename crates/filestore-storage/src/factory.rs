use crate::{DbStorage, FileStorage, FsStorage, GedStorage, StorageError, StorageFacade, StorageResult};
use filestore_core::{Config, StorageType};
use filestore_db::FileRecordRepository;
use std::sync::Arc;

/// Create the storage backend selected by configuration.
///
/// Construction failures (unwritable root, bad object-store settings) are fatal at
/// startup rather than surfacing per request.
pub async fn create_storage(
    config: &Config,
    repository: Arc<dyn FileRecordRepository>,
) -> StorageResult<StorageFacade> {
    let backend: Arc<dyn FileStorage> = match config.storage_type() {
        StorageType::Fs => Arc::new(FsStorage::new(config.fs_upload_dir(), repository).await?),

        StorageType::Db => Arc::new(DbStorage::new(repository)),

        #[cfg(feature = "storage-s3")]
        StorageType::Ged => {
            let endpoint = config.ged_url().ok_or_else(|| {
                StorageError::ConfigError("FILE_GED_URL not configured".to_string())
            })?;
            let username = config.ged_username().ok_or_else(|| {
                StorageError::ConfigError("FILE_GED_USERNAME not configured".to_string())
            })?;
            let password = config.ged_password().ok_or_else(|| {
                StorageError::ConfigError("FILE_GED_PASSWORD not configured".to_string())
            })?;

            let client =
                crate::S3ObjectClient::new(endpoint, username, password, config.ged_region())?;
            Arc::new(GedStorage::new(
                Arc::new(client),
                config.ged_bucket(),
                repository,
            ))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageType::Ged => {
            return Err(StorageError::ConfigError(
                "GED storage backend not available (storage-s3 feature not enabled)".to_string(),
            ))
        }
    };

    tracing::info!(storage_type = %backend.backend_type(), "Storage backend initialized");

    Ok(StorageFacade::new(backend))
}
