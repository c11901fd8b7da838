//! Filestore Core Library
//!
//! This crate provides the domain model, configuration and error types shared by the
//! storage backends, the metadata store and the HTTP layer.

pub mod config;
pub mod error;
pub mod files;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, FileServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use files::{extract_extension, generate_stored_name};
pub use models::{FileMetadata, FileRecord, NewFileRecord, UploadResponse};
pub use storage_types::StorageType;
