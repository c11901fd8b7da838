//! Single entry point over the active backend.

use crate::traits::{FileStorage, FileUpload, LoadedFile, StorageResult};
use filestore_core::{FileRecord, StorageType};
use std::sync::Arc;

/// Holds the one backend chosen at startup and delegates to it.
#[derive(Clone)]
pub struct StorageFacade {
    backend: Arc<dyn FileStorage>,
}

impl StorageFacade {
    pub fn new(backend: Arc<dyn FileStorage>) -> Self {
        Self { backend }
    }

    pub async fn store(&self, upload: FileUpload) -> StorageResult<FileRecord> {
        self.backend.store(upload).await
    }

    pub async fn load(&self, id: i64) -> StorageResult<LoadedFile> {
        self.backend.load(id).await
    }

    pub fn backend_type(&self) -> StorageType {
        self.backend.backend_type()
    }
}
