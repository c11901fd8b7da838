//! Filestore Storage Library
//!
//! One [`FileStorage`] contract implemented by three interchangeable backends:
//!
//! - [`FsStorage`]: bytes on local disk under `<root>/<yyyy>/<MM>/<stored name>`
//! - [`DbStorage`]: bytes inline in the metadata record
//! - [`GedStorage`]: bytes in an S3-compatible bucket under `<yyyy>/<MM>/<stored name>`
//!
//! Every backend writes the bytes first and registers the metadata record second,
//! so a record that resolves always points at bytes that were fully written.
//! [`StorageFacade`] holds the one backend selected from configuration at startup.

pub mod database;
pub mod facade;
pub mod factory;
pub mod ged;
pub(crate) mod keys;
pub mod local;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod object_client;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use database::DbStorage;
pub use facade::StorageFacade;
pub use factory::create_storage;
pub use filestore_core::StorageType;
pub use ged::GedStorage;
pub use local::FsStorage;
#[cfg(any(test, feature = "test-util"))]
pub use memory::{InMemoryObjectClient, ObjectCall};
pub use object_client::ObjectClient;
#[cfg(feature = "storage-s3")]
pub use s3::S3ObjectClient;
pub use traits::{FileStorage, FileUpload, LoadedFile, StorageError, StorageResult};
