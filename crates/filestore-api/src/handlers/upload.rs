use crate::error::UploadFailure;
use crate::state::AppState;
use crate::utils::upload::extract_multipart_file;
use axum::{
    extract::{Multipart, State},
    Json,
};
use filestore_core::UploadResponse;
use filestore_storage::FileUpload;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "Validation failed", body = UploadResponse),
        (status = 500, description = "Upload failed", body = UploadResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_file"))]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadFailure> {
    let file = extract_multipart_file(multipart).await?;

    state.validator.validate(&file.filename, file.data.len())?;

    let start = std::time::Instant::now();
    let upload = FileUpload::new(file.data, file.filename, file.content_type);
    let record = state
        .storage
        .store(upload)
        .await
        .map_err(|e| UploadFailure::internal(e, &state.config))?;

    tracing::info!(
        file_id = record.id,
        original_name = %record.original_name,
        storage_type = %record.storage_type,
        size_bytes = record.size,
        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
        "File uploaded"
    );

    Ok(Json(UploadResponse::uploaded(record.metadata())))
}
