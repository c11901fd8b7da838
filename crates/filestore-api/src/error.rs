//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`; domain errors convert
//! into `HttpAppError` and render with a consistent status, body and log level.
//! The upload endpoint answers with the [`UploadResponse`] envelope instead, through
//! [`UploadFailure`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use filestore_core::{AppError, Config, ErrorMetadata, LogLevel, UploadResponse};
use serde::Serialize;
use utoipa::ToSchema;

use crate::validation::ValidationError;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// [`AppError`] rendered as an [`ErrorResponse`].
///
/// Built through `From`, details stay hidden. [`HttpAppError::new`] lets a handler
/// expose them outside production.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    expose_details: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, config: &Config) -> Self {
        Self {
            error,
            expose_details: !config.is_production(),
        }
    }
}

impl<E> From<E> for HttpAppError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self {
            error: err.into(),
            expose_details: false,
        }
    }
}

pub(crate) fn log_error(error: &AppError) {
    let (kind, code) = (error.error_type(), error.error_code());
    match error.log_level() {
        LogLevel::Debug => tracing::debug!(error = %error, kind, code, "Request failed"),
        LogLevel::Warn => tracing::warn!(error = %error, kind, code, "Request failed"),
        LogLevel::Error => tracing::error!(
            error = %error.detailed_message(),
            kind,
            code,
            "Request failed"
        ),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let err = self.error;
        log_error(&err);

        let status =
            StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let (details, error_type) = if self.expose_details && !err.is_sensitive() {
            (Some(err.detailed_message()), Some(err.error_type().to_string()))
        } else {
            (None, None)
        };

        let body = ErrorResponse {
            error: err.client_message(),
            details,
            error_type,
            code: err.error_code().to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Upload rejection rendered as `{success: false, message}`.
#[derive(Debug)]
pub enum UploadFailure {
    /// Client-side problem with the submitted file: 400.
    Validation(String),
    /// Anything else: 500.
    Internal {
        error: AppError,
        expose_details: bool,
    },
}

impl UploadFailure {
    /// A 500 whose message carries details outside production.
    pub fn internal(error: impl Into<AppError>, config: &Config) -> Self {
        UploadFailure::Internal {
            error: error.into(),
            expose_details: !config.is_production(),
        }
    }
}

impl From<ValidationError> for UploadFailure {
    fn from(err: ValidationError) -> Self {
        UploadFailure::Validation(err.to_string())
    }
}

impl From<AppError> for UploadFailure {
    fn from(err: AppError) -> Self {
        match err {
            AppError::InvalidInput(msg) => UploadFailure::Validation(msg),
            error => UploadFailure::Internal {
                error,
                expose_details: false,
            },
        }
    }
}

impl IntoResponse for UploadFailure {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            UploadFailure::Validation(msg) => {
                tracing::debug!(reason = %msg, "Upload rejected");
                (StatusCode::BAD_REQUEST, format!("Validation failed: {}", msg))
            }
            UploadFailure::Internal {
                error,
                expose_details,
            } => {
                log_error(&error);
                let message = if expose_details && !error.is_sensitive() {
                    error.to_string()
                } else {
                    error.client_message()
                };
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Upload failed: {}", message),
                )
            }
        };

        (status, Json(UploadResponse::failed(message))).into_response()
    }
}
