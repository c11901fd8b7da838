//! Database blob backend: bytes live inline in the metadata record.

use crate::traits::{FileStorage, FileUpload, LoadedFile, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use filestore_core::{FileRecord, NewFileRecord, StorageType};
use filestore_db::FileRecordRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct DbStorage {
    repository: Arc<dyn FileRecordRepository>,
}

impl DbStorage {
    pub fn new(repository: Arc<dyn FileRecordRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl FileStorage for DbStorage {
    async fn store(&self, upload: FileUpload) -> StorageResult<FileRecord> {
        let start = std::time::Instant::now();

        let new_record = NewFileRecord::for_upload(
            upload.original_name,
            upload.content_type,
            upload.size,
            StorageType::Db,
        )
        .with_uploaded_at(Utc::now())
        .with_data(upload.data.to_vec());

        let record = self.repository.save(new_record).await?;

        tracing::info!(
            file_id = record.id,
            stored_name = %record.stored_name,
            size_bytes = upload.data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Database blob stored"
        );

        Ok(record)
    }

    async fn load(&self, id: i64) -> StorageResult<LoadedFile> {
        let mut record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let data = record.data.take().ok_or_else(|| {
            StorageError::Metadata(format!("File record {} has no inline data", id))
        })?;

        Ok(LoadedFile {
            data: Bytes::from(data),
            record,
        })
    }

    fn backend_type(&self) -> StorageType {
        StorageType::Db
    }
}
