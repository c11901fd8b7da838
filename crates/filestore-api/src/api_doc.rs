//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use filestore_core::{FileMetadata, StorageType, UploadResponse};

/// Returns the OpenAPI spec served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Filestore API",
        version = "0.1.0",
        description = "Upload files and fetch their metadata or bytes. Files are kept on local disk, in the database, or in an S3-compatible object store depending on deployment configuration."
    ),
    paths(
        handlers::upload::upload_file,
        handlers::files::get_metadata,
        handlers::files::download_file,
        handlers::files::preview_file,
        health::health_check,
    ),
    components(
        schemas(
            FileMetadata,
            UploadResponse,
            StorageType,
            error::ErrorResponse,
            health::HealthCheckResponse,
        )
    ),
    tags(
        (name = "files", description = "File upload and retrieval"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
