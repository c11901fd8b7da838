//! Metadata store for file records.
//!
//! [`FileRecordRepository`] is the contract the storage backends register and look
//! up records through. PostgreSQL is the production implementation; the in-memory
//! one backs tests and is enabled by the `test-util` feature.

pub mod db;

pub use db::{FileRecordRepository, PgFileRecordRepository};

#[cfg(any(test, feature = "test-util"))]
pub use db::InMemoryFileRecordRepository;
