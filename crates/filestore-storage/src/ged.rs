//! Object-store (GED) backend.

use crate::keys::{bucket_path, key_from_bucket_path, object_key};
use crate::object_client::ObjectClient;
use crate::traits::{FileStorage, FileUpload, LoadedFile, StorageError, StorageResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use filestore_core::{FileRecord, NewFileRecord, StorageType};
use filestore_db::FileRecordRepository;
use std::sync::Arc;

/// Stores bytes as objects in one bucket, keyed `{yyyy}/{MM}/{stored_name}`.
#[derive(Clone)]
pub struct GedStorage {
    client: Arc<dyn ObjectClient>,
    bucket: String,
    repository: Arc<dyn FileRecordRepository>,
}

impl GedStorage {
    pub fn new(
        client: Arc<dyn ObjectClient>,
        bucket: impl Into<String>,
        repository: Arc<dyn FileRecordRepository>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            repository,
        }
    }

    /// Check-then-create. Creation tolerates a concurrent creator.
    async fn ensure_bucket_exists(&self) -> StorageResult<()> {
        if !self.client.bucket_exists(&self.bucket).await? {
            tracing::info!(bucket = %self.bucket, "Bucket missing, creating it");
            self.client.create_bucket(&self.bucket).await?;
        }
        Ok(())
    }

    /// Object key for a record. Records whose locator does not carry the bucket
    /// prefix predate it and are addressed by their stored name.
    fn key_for<'a>(&self, record: &'a FileRecord) -> &'a str {
        match record
            .storage_path
            .as_deref()
            .and_then(|path| key_from_bucket_path(&self.bucket, path))
        {
            Some(key) => key,
            None => {
                tracing::warn!(
                    file_id = record.id,
                    storage_path = ?record.storage_path,
                    stored_name = %record.stored_name,
                    bucket = %self.bucket,
                    "Storage path lacks bucket prefix, falling back to stored name as object key"
                );
                &record.stored_name
            }
        }
    }

    pub(crate) async fn store_at(
        &self,
        upload: FileUpload,
        now: DateTime<Utc>,
    ) -> StorageResult<FileRecord> {
        self.ensure_bucket_exists().await?;

        let new_record = NewFileRecord::for_upload(
            upload.original_name,
            upload.content_type,
            upload.size,
            StorageType::Ged,
        )
        .with_uploaded_at(now);

        let key = object_key(now, &new_record.stored_name);
        let size = upload.data.len();
        let start = std::time::Instant::now();

        self.client
            .put_object(&self.bucket, &key, upload.data, &new_record.content_type)
            .await
            .map_err(|e| match e {
                StorageError::UploadFailed(_) => e,
                other => StorageError::UploadFailed(other.to_string()),
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store upload successful"
        );

        let record = self
            .repository
            .save(new_record.with_storage_path(bucket_path(&self.bucket, &key)))
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    "Object uploaded but metadata registration failed"
                );
                StorageError::from(e)
            })?;

        Ok(record)
    }
}

#[async_trait]
impl FileStorage for GedStorage {
    async fn store(&self, upload: FileUpload) -> StorageResult<FileRecord> {
        self.store_at(upload, Utc::now()).await
    }

    async fn load(&self, id: i64) -> StorageResult<LoadedFile> {
        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;

        let key = self.key_for(&record);
        let start = std::time::Instant::now();

        let data = match self.client.get_object(&self.bucket, key).await {
            Ok(data) => data,
            Err(StorageError::NotFound(missing)) => {
                tracing::warn!(
                    file_id = id,
                    bucket = %self.bucket,
                    key = %key,
                    "File record exists but object is missing"
                );
                return Err(StorageError::NotFound(missing));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            file_id = id,
            bucket = %self.bucket,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Object store download successful"
        );

        Ok(LoadedFile { data, record })
    }

    fn backend_type(&self) -> StorageType {
        StorageType::Ged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryObjectClient, ObjectCall};
    use chrono::TimeZone;
    use filestore_db::InMemoryFileRecordRepository;

    fn storage() -> (GedStorage, InMemoryObjectClient, InMemoryFileRecordRepository) {
        let client = InMemoryObjectClient::new();
        let repo = InMemoryFileRecordRepository::new();
        let storage = GedStorage::new(
            Arc::new(client.clone()),
            "documents",
            Arc::new(repo.clone()),
        );
        (storage, client, repo)
    }

    #[tokio::test]
    async fn test_store_then_load_round_trip() {
        let (storage, client, _repo) = storage();
        let bytes = b"%PDF-1.7 ...".to_vec();

        let record = storage
            .store(FileUpload::new(bytes.clone(), "a.txt", "text/plain"))
            .await
            .unwrap();

        assert_eq!(record.storage_type, StorageType::Ged);
        assert_eq!(record.extension, "txt");
        assert!(record.data.is_none());
        let path = record.storage_path.clone().unwrap();
        assert!(path.starts_with("documents/"));

        let key = path.strip_prefix("documents/").unwrap();
        assert_eq!(
            client.content_type("documents", key).await.as_deref(),
            Some("text/plain")
        );

        let loaded = storage.load(record.id).await.unwrap();
        assert_eq!(loaded.data.as_ref(), bytes.as_slice());
        assert_eq!(loaded.record.size, bytes.len() as i64);
        assert_eq!(loaded.record.original_name, "a.txt");
    }

    #[tokio::test]
    async fn test_object_key_uses_date_folder() {
        let (storage, client, _repo) = storage();
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap();

        let record = storage
            .store_at(FileUpload::new(b"x".to_vec(), "scan.png", "image/png"), at)
            .await
            .unwrap();

        let expected_key = format!("2024/03/{}", record.stored_name);
        assert_eq!(
            record.storage_path.as_deref(),
            Some(format!("documents/{}", expected_key).as_str())
        );
        assert_eq!(client.object_keys("documents").await, vec![expected_key]);
    }

    #[tokio::test]
    async fn test_bucket_created_once_when_missing() {
        let (storage, client, _repo) = storage();

        storage
            .store(FileUpload::new(b"1".to_vec(), "a.txt", "text/plain"))
            .await
            .unwrap();
        storage
            .store(FileUpload::new(b"2".to_vec(), "b.txt", "text/plain"))
            .await
            .unwrap();

        let creates = client
            .calls()
            .await
            .into_iter()
            .filter(|call| matches!(call, ObjectCall::CreateBucket(_)))
            .count();
        assert_eq!(creates, 1);
        assert!(client.has_bucket("documents").await);
    }

    #[tokio::test]
    async fn test_failed_upload_registers_no_metadata() {
        let (storage, client, repo) = storage();
        client.fail_puts(true);

        let err = storage
            .store(FileUpload::new(b"x".to_vec(), "a.txt", "text/plain"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_legacy_record_falls_back_to_stored_name() {
        let (storage, client, repo) = storage();

        let mut legacy = NewFileRecord::for_upload("old.txt", "text/plain", 6, StorageType::Ged)
            .with_storage_path("2023/11/old.txt_legacy.txt")
            .into_record(5, Utc::now());
        legacy.stored_name = "old.txt_legacy.txt".to_string();
        repo.insert_raw(legacy).await;
        client.insert_object("documents", "old.txt_legacy.txt", b"legacy".to_vec()).await;

        let loaded = storage.load(5).await.unwrap();
        assert_eq!(loaded.data.as_ref(), b"legacy");
        assert!(client.calls().await.contains(&ObjectCall::GetObject {
            bucket: "documents".to_string(),
            key: "old.txt_legacy.txt".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_record_without_storage_path_falls_back_to_stored_name() {
        let (storage, client, repo) = storage();

        let legacy = NewFileRecord::for_upload("old.txt", "text/plain", 3, StorageType::Ged)
            .into_record(8, Utc::now());
        let stored_name = legacy.stored_name.clone();
        repo.insert_raw(legacy).await;
        client.insert_object("documents", &stored_name, b"old".to_vec()).await;

        let loaded = storage.load(8).await.unwrap();
        assert_eq!(loaded.data.as_ref(), b"old");
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let (storage, client, repo) = storage();
        client.create_bucket("documents").await.unwrap();

        let orphan = NewFileRecord::for_upload("a.txt", "text/plain", 1, StorageType::Ged)
            .with_storage_path("documents/2024/03/a.txt_gone.txt")
            .into_record(3, Utc::now());
        repo.insert_raw(orphan).await;

        let err = storage.load(3).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_load_unknown_id_is_not_found() {
        let (storage, _client, _repo) = storage();
        let err = storage.load(77).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_registration_leaves_object_orphaned() {
        let client = InMemoryObjectClient::new();
        let storage = GedStorage::new(
            Arc::new(client.clone()),
            "documents",
            Arc::new(crate::test_support::FailingFileRecordRepository),
        );
        let march = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();

        let err = storage
            .store_at(FileUpload::new(b"orphan".to_vec(), "a.txt", "text/plain"), march)
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Metadata(_)));
        let keys = client.object_keys("documents").await;
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with("2024/03/a.txt_"));
    }
}

