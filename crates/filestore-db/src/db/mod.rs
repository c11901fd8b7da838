//! Database repositories for data access layer
//
// File metadata repositories
pub mod file_record;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;

pub use file_record::{FileRecordRepository, PgFileRecordRepository, StoredFileRow};
#[cfg(any(test, feature = "test-util"))]
pub use memory::InMemoryFileRecordRepository;
