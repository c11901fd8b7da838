//! Route configuration and setup.
//!
//! File routes live here; health checks in [health](health).

pub(crate) mod health;

use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use filestore_core::Config;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    let body_limit = config
        .max_file_size_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(body_limit_bytes = body_limit, "Request body limit configured");

    file_routes()
        .route("/health", get(health::health_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

fn file_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/files/upload", post(handlers::upload::upload_file))
        .route("/files/{id}/metadata", get(handlers::files::get_metadata))
        .route("/files/{id}/download", get(handlers::files::download_file))
        .route("/files/{id}/preview", get(handlers::files::preview_file))
}
