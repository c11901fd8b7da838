//! Storage abstraction trait
//!
//! This module defines the FileStorage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use filestore_core::{AppError, FileRecord, StorageType};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Metadata store error: {0}")]
    Metadata(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<AppError> for StorageError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::NotFound(msg) => StorageError::NotFound(msg),
            other => StorageError::Metadata(other.to_string()),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(format!("File not found: {}", msg)),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Payload handed to a backend by the upload boundary.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub data: Bytes,
    pub original_name: String,
    pub content_type: String,
    /// Caller-reported size; recorded as-is, never recomputed from the stored bytes.
    pub size: i64,
}

impl FileUpload {
    pub fn new(
        data: impl Into<Bytes>,
        original_name: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        let data = data.into();
        let size = data.len() as i64;
        Self {
            data,
            original_name: original_name.into(),
            content_type: content_type.into(),
            size,
        }
    }

    pub fn with_size(mut self, size: i64) -> Self {
        self.size = size;
        self
    }
}

/// Bytes and metadata returned by [`FileStorage::load`].
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub data: Bytes,
    pub record: FileRecord,
}

/// Storage abstraction trait
///
/// Backends persist the bytes, generate the stored name, and register the
/// [`FileRecord`] with the metadata store. `load` reverses the path.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist the payload and return the registered record (identifier populated).
    async fn store(&self, upload: FileUpload) -> StorageResult<FileRecord>;

    /// Resolve a record and its bytes. Unknown identifiers fail with `NotFound`.
    async fn load(&self, id: i64) -> StorageResult<LoadedFile>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageType;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_upload_size_defaults_to_payload_length() {
        let upload = FileUpload::new(b"hello".to_vec(), "a.txt", "text/plain");
        assert_eq!(upload.size, 5);
        assert_eq!(upload.with_size(9).size, 9);
    }

    #[test]
    fn test_not_found_maps_to_app_not_found() {
        let err = AppError::from(StorageError::NotFound("42".to_string()));
        assert!(matches!(err, AppError::NotFound(_)));

        let err = AppError::from(StorageError::UploadFailed("timeout".to_string()));
        assert!(matches!(err, AppError::Storage(_)));
    }
}
