use crate::keys::{date_folder, object_key};
use crate::traits::{FileStorage, FileUpload, LoadedFile, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use filestore_core::{FileRecord, NewFileRecord, StorageType};
use filestore_db::FileRecordRepository;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct FsStorage {
    root: PathBuf,
    repository: Arc<dyn FileRecordRepository>,
}

impl FsStorage {
    /// Create a new FsStorage instance
    ///
    /// `root` is created if absent and resolved to an absolute path, so recorded
    /// storage paths stay valid regardless of the working directory.
    pub async fn new(
        root: impl Into<PathBuf>,
        repository: Arc<dyn FileRecordRepository>,
    ) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let root = fs::canonicalize(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to resolve storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(FsStorage { root, repository })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Convert a relative key to a path under the root, rejecting anything that
    /// could escape it (parent components, absolute paths, drive prefixes).
    fn key_to_path(&self, key: &str) -> StorageResult<PathBuf> {
        let relative = Path::new(key);
        if key.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::InvalidKey(format!(
                "Storage key resolves outside storage directory: {}",
                key
            )));
        }

        Ok(self.root.join(relative))
    }

    pub(crate) async fn store_at(
        &self,
        upload: FileUpload,
        now: DateTime<Utc>,
    ) -> StorageResult<FileRecord> {
        fs::create_dir_all(&self.root).await?;

        let new_record = NewFileRecord::for_upload(
            upload.original_name,
            upload.content_type,
            upload.size,
            StorageType::Fs,
        )
        .with_uploaded_at(now);

        let key = object_key(now, &new_record.stored_name);
        let path = self.key_to_path(&key)?;
        fs::create_dir_all(self.root.join(date_folder(now))).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to create file");
            StorageError::IoError(e)
        })?;
        file.write_all(&upload.data).await?;
        file.sync_all().await?;

        tracing::info!(
            path = %path.display(),
            stored_name = %new_record.stored_name,
            size_bytes = upload.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage write successful"
        );

        let record = self
            .repository
            .save(new_record.with_storage_path(path.to_string_lossy().into_owned()))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    path = %path.display(),
                    "File written but metadata registration failed"
                );
                StorageError::from(e)
            })?;

        Ok(record)
    }
}

#[async_trait]
impl FileStorage for FsStorage {
    async fn store(&self, upload: FileUpload) -> StorageResult<FileRecord> {
        self.store_at(upload, Utc::now()).await
    }

    async fn load(&self, id: i64) -> StorageResult<LoadedFile> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let path = record.storage_path.as_deref().ok_or_else(|| {
            StorageError::Metadata(format!("File record {} has no storage path", id))
        })?;

        let start = std::time::Instant::now();

        let data = fs::read(path).await.map_err(|e| {
            tracing::warn!(
                error = %e,
                file_id = id,
                path = %path,
                "File record exists but bytes could not be read"
            );
            StorageError::IoError(e)
        })?;

        tracing::info!(
            file_id = id,
            path = %path,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(LoadedFile {
            data: Bytes::from(data),
            record,
        })
    }

    fn backend_type(&self) -> StorageType {
        StorageType::Fs
    }
}
