use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::files::{extract_extension, generate_stored_name};
use crate::storage_types::StorageType;

/// Persisted metadata for one stored file.
///
/// Records are immutable once registered with the metadata store. `data` is only
/// populated for [`StorageType::Db`]; other backends keep the bytes external.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub extension: String,
    pub content_type: String,
    pub size: i64,
    pub storage_type: StorageType,
    /// Absolute path (FS), `bucket/key` (GED), unset (DB).
    pub storage_path: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub data: Option<Vec<u8>>,
}

impl FileRecord {
    pub fn metadata(&self) -> FileMetadata {
        FileMetadata::from(self)
    }
}

/// A file record that has not been registered yet (no identifier).
#[derive(Debug, Clone)]
pub struct NewFileRecord {
    pub original_name: String,
    pub stored_name: String,
    pub extension: String,
    pub content_type: String,
    pub size: i64,
    pub storage_type: StorageType,
    pub storage_path: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub data: Option<Vec<u8>>,
}

impl NewFileRecord {
    /// Start a record for an upload, deriving the extension and a fresh stored name.
    pub fn for_upload(
        original_name: impl Into<String>,
        content_type: impl Into<String>,
        size: i64,
        storage_type: StorageType,
    ) -> Self {
        let original_name = original_name.into();
        let extension = extract_extension(&original_name);
        let stored_name = generate_stored_name(&original_name, &extension);

        Self {
            original_name,
            stored_name,
            extension,
            content_type: content_type.into(),
            size,
            storage_type,
            storage_path: None,
            uploaded_at: None,
            data: None,
        }
    }

    pub fn with_storage_path(mut self, storage_path: impl Into<String>) -> Self {
        self.storage_path = Some(storage_path.into());
        self
    }

    pub fn with_uploaded_at(mut self, uploaded_at: DateTime<Utc>) -> Self {
        self.uploaded_at = Some(uploaded_at);
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the store-assigned identifier, stamping `uploaded_at` with `now` when unset.
    pub fn into_record(self, id: i64, now: DateTime<Utc>) -> FileRecord {
        FileRecord {
            id,
            original_name: self.original_name,
            stored_name: self.stored_name,
            extension: self.extension,
            content_type: self.content_type,
            size: self.size,
            storage_type: self.storage_type,
            storage_path: self.storage_path,
            uploaded_at: self.uploaded_at.unwrap_or(now),
            data: self.data,
        }
    }
}

/// Boundary representation of a [`FileRecord`]. Never carries the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub file_id: String,
    pub original_name: String,
    pub stored_name: String,
    pub extension: String,
    pub content_type: String,
    pub size: i64,
    pub storage_type: StorageType,
    pub uploaded_at: DateTime<Utc>,
}

impl From<&FileRecord> for FileMetadata {
    fn from(record: &FileRecord) -> Self {
        FileMetadata {
            file_id: record.id.to_string(),
            original_name: record.original_name.clone(),
            stored_name: record.stored_name.clone(),
            extension: record.extension.clone(),
            content_type: record.content_type.clone(),
            size: record.size,
            storage_type: record.storage_type,
            uploaded_at: record.uploaded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<FileMetadata>,
}

impl UploadResponse {
    pub fn uploaded(metadata: FileMetadata) -> Self {
        Self {
            success: true,
            message: "File uploaded successfully".to_string(),
            metadata: Some(metadata),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_for_upload_derives_extension_and_stored_name() {
        let new = NewFileRecord::for_upload("report.PDF", "application/pdf", 42, StorageType::Fs);
        assert_eq!(new.extension, "pdf");
        assert!(new.stored_name.starts_with("report.PDF_"));
        assert!(new.stored_name.ends_with(".pdf"));
        assert!(new.storage_path.is_none());
        assert!(new.data.is_none());
    }

    #[test]
    fn test_into_record_keeps_supplied_timestamp() {
        let supplied = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 16, 10, 0, 0).unwrap();

        let record = NewFileRecord::for_upload("a.txt", "text/plain", 3, StorageType::Fs)
            .with_uploaded_at(supplied)
            .into_record(7, later);

        assert_eq!(record.id, 7);
        assert_eq!(record.uploaded_at, supplied);
    }

    #[test]
    fn test_into_record_stamps_missing_timestamp() {
        let now = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let record = NewFileRecord::for_upload("a.txt", "text/plain", 3, StorageType::Db)
            .into_record(1, now);
        assert_eq!(record.uploaded_at, now);
    }

    #[test]
    fn test_metadata_json_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 30, 0).unwrap();
        let record = NewFileRecord::for_upload("a.txt", "text/plain", 5, StorageType::Db)
            .with_data(b"hello".to_vec())
            .into_record(12, now);

        let json = serde_json::to_value(record.metadata()).unwrap();
        assert_eq!(json["fileId"], "12");
        assert_eq!(json["originalName"], "a.txt");
        assert_eq!(json["extension"], "txt");
        assert_eq!(json["contentType"], "text/plain");
        assert_eq!(json["size"], 5);
        assert_eq!(json["storageType"], "DB");
        assert!(json.get("storedName").is_some());
        assert!(json.get("uploadedAt").is_some());
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_failed_upload_response_omits_metadata() {
        let json = serde_json::to_value(UploadResponse::failed("Validation failed: File is empty"))
            .unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Validation failed: File is empty");
        assert!(json.get("metadata").is_none());
    }
}
