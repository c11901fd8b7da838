use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::download::{content_disposition, Disposition};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue, Response, StatusCode},
    Json,
};
use filestore_core::{AppError, FileMetadata, FileRecord};
use filestore_storage::{LoadedFile, StorageError};
use std::sync::Arc;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

fn not_found(state: &AppState, id: &str) -> HttpAppError {
    HttpAppError::new(
        AppError::NotFound(format!("File not found: {}", id)),
        &state.config,
    )
}

/// Resolve a path id to a loaded file. Every failure surfaces as 404.
async fn load_file(state: &AppState, id: &str) -> Result<LoadedFile, HttpAppError> {
    let file_id: i64 = id.trim().parse().map_err(|_| not_found(state, id))?;

    state.storage.load(file_id).await.map_err(|e| {
        match &e {
            StorageError::NotFound(_) => {}
            other => tracing::warn!(file_id, error = %other, "File could not be loaded"),
        }
        not_found(state, id)
    })
}

/// Stored content types come from the uploader; one that is not a valid header
/// value is served as an opaque byte stream.
fn content_type_header(record: &FileRecord) -> HeaderValue {
    HeaderValue::from_str(&record.content_type).unwrap_or_else(|_| {
        tracing::warn!(
            file_id = record.id,
            content_type = ?record.content_type,
            "Stored content type is not a valid header value"
        );
        HeaderValue::from_static(FALLBACK_CONTENT_TYPE)
    })
}

fn file_response(
    state: &AppState,
    file: LoadedFile,
    disposition: Disposition,
) -> Result<Response<Body>, HttpAppError> {
    let record = file.record;
    let length = file.data.len();

    if record.size != length as i64 {
        tracing::warn!(
            file_id = record.id,
            recorded_size = record.size,
            actual_size = length,
            "Recorded size differs from stored bytes"
        );
    }

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_header(&record))
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(disposition, &record.original_name),
        )
        .body(Body::from(file.data))
        .map_err(|e| {
            tracing::warn!(file_id = record.id, error = %e, "Failed to build file response");
            not_found(state, &record.id.to_string())
        })
}

#[utoipa::path(
    get,
    path = "/files/{id}/metadata",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File metadata", body = FileMetadata),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "get_metadata"))]
pub async fn get_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<FileMetadata>, HttpAppError> {
    let file = load_file(&state, &id).await?;
    Ok(Json(file.record.metadata()))
}

#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File bytes as attachment", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "download_file"))]
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, HttpAppError> {
    let file = load_file(&state, &id).await?;
    file_response(&state, file, Disposition::Attachment)
}

#[utoipa::path(
    get,
    path = "/files/{id}/preview",
    tag = "files",
    params(
        ("id" = String, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File bytes for inline display", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(file_id = %id, operation = "preview_file"))]
pub async fn preview_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response<Body>, HttpAppError> {
    let file = load_file(&state, &id).await?;
    file_response(&state, file, Disposition::Inline)
}
