use async_trait::async_trait;
use filestore_core::{AppError, FileRecord, NewFileRecord};
use filestore_db::FileRecordRepository;

/// Repository whose writes always fail; lookups find nothing.
pub(crate) struct FailingFileRecordRepository;

#[async_trait]
impl FileRecordRepository for FailingFileRecordRepository {
    async fn save(&self, _record: NewFileRecord) -> Result<FileRecord, AppError> {
        Err(AppError::Storage(
            "connection reset by metadata store".to_string(),
        ))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<FileRecord>, AppError> {
        Ok(None)
    }
}
