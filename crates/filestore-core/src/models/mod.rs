//! Domain models

pub mod file_record;

pub use file_record::{FileMetadata, FileRecord, NewFileRecord, UploadResponse};
