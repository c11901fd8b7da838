//! Filestore API Library
//!
//! HTTP surface for uploading files and fetching their metadata or bytes, plus the
//! application setup (configuration, telemetry, database, storage backend).

mod api_doc;
mod handlers;
mod telemetry;
mod utils;

// Public modules
pub mod error;
pub mod setup;
pub mod state;
pub mod validation;

// Re-exports
pub use error::ErrorResponse;
pub use state::AppState;
pub use validation::{FileValidator, ValidationError};
