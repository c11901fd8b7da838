//! In-memory file record repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use filestore_core::{AppError, FileRecord, NewFileRecord};
use tokio::sync::Mutex;

use super::file_record::FileRecordRepository;

/// Keeps records in a map guarded by a mutex. Ids start at 1 and are never reused.
#[derive(Clone, Default)]
pub struct InMemoryFileRecordRepository {
    records: Arc<Mutex<HashMap<i64, FileRecord>>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryFileRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed record as-is, bypassing id assignment.
    pub async fn insert_raw(&self, record: FileRecord) {
        self.next_id.fetch_max(record.id, Ordering::SeqCst);
        self.records.lock().await.insert(record.id, record);
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait::async_trait]
impl FileRecordRepository for InMemoryFileRecordRepository {
    async fn save(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = record.into_record(id, Utc::now());
        self.records.lock().await.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        Ok(self.records.lock().await.get(&id).cloned())
    }
}
