//! File record repository: create and fetch rows of the stored_files table.

use chrono::{DateTime, Utc};
use filestore_core::{AppError, FileRecord, NewFileRecord, StorageType};
use sqlx::{PgPool, Postgres};

/// Persists and retrieves [`FileRecord`]s keyed by their store-assigned id.
#[async_trait::async_trait]
pub trait FileRecordRepository: Send + Sync {
    /// Register a new record. Assigns the id and stamps `uploaded_at` with now when unset.
    async fn save(&self, record: NewFileRecord) -> Result<FileRecord, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>, AppError>;
}

/// Row type for stored_files table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
pub struct StoredFileRow {
    pub id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub extension: String,
    pub content_type: String,
    pub size: i64,
    pub storage_type: StorageType,
    pub storage_path: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub data: Option<Vec<u8>>,
}

impl StoredFileRow {
    pub fn to_file_record(self) -> FileRecord {
        FileRecord {
            id: self.id,
            original_name: self.original_name,
            stored_name: self.stored_name,
            extension: self.extension,
            content_type: self.content_type,
            size: self.size,
            storage_type: self.storage_type,
            storage_path: self.storage_path,
            uploaded_at: self.uploaded_at,
            data: self.data,
        }
    }
}

/// Repository for stored_files table.
#[derive(Clone)]
pub struct PgFileRecordRepository {
    pool: PgPool,
}

impl PgFileRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl FileRecordRepository for PgFileRecordRepository {
    #[tracing::instrument(
        skip(self, record),
        fields(
            db.table = "stored_files",
            storage_type = %record.storage_type,
            stored_name = %record.stored_name
        )
    )]
    async fn save(&self, record: NewFileRecord) -> Result<FileRecord, AppError> {
        let uploaded_at = record.uploaded_at.unwrap_or_else(Utc::now);

        let row: StoredFileRow = sqlx::query_as::<Postgres, StoredFileRow>(
            r#"
            INSERT INTO stored_files
                (original_name, stored_name, extension, content_type, size,
                 storage_type, storage_path, uploaded_at, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, original_name, stored_name, extension, content_type, size,
                      storage_type, storage_path, uploaded_at, data
            "#,
        )
        .bind(&record.original_name)
        .bind(&record.stored_name)
        .bind(&record.extension)
        .bind(&record.content_type)
        .bind(record.size)
        .bind(record.storage_type)
        .bind(&record.storage_path)
        .bind(uploaded_at)
        .bind(&record.data)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(file_id = row.id, "File record registered");

        Ok(row.to_file_record())
    }

    #[tracing::instrument(skip(self), fields(db.table = "stored_files", db.record_id = %id))]
    async fn find_by_id(&self, id: i64) -> Result<Option<FileRecord>, AppError> {
        let row: Option<StoredFileRow> = sqlx::query_as::<Postgres, StoredFileRow>(
            r#"
            SELECT id, original_name, stored_name, extension, content_type, size,
                   storage_type, storage_path, uploaded_at, data
            FROM stored_files
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.to_file_record()))
    }
}
