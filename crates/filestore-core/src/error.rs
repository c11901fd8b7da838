//! Cross-crate error type.
//!
//! [`AppError`] is what repositories and the HTTP layer exchange. Each variant knows
//! how it is presented to clients through [`ErrorMetadata`].

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Level an error is logged at when it reaches the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes: bad input, unknown ids
    Debug,
    Warn,
    /// Failures the operator has to look at
    Error,
}

/// How an error is rendered to a client.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `NOT_FOUND`
    fn error_code(&self) -> &'static str;

    fn client_message(&self) -> String;

    /// Sensitive errors only expose `client_message`, never their details.
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

struct Presentation {
    status: u16,
    code: &'static str,
    sensitive: bool,
    level: LogLevel,
}

const fn presentation(
    status: u16,
    code: &'static str,
    sensitive: bool,
    level: LogLevel,
) -> Presentation {
    Presentation {
        status,
        code,
        sensitive,
        level,
    }
}

impl AppError {
    fn presentation(&self) -> Presentation {
        match self {
            AppError::Database(_) => presentation(500, "DATABASE_ERROR", true, LogLevel::Error),
            AppError::Storage(_) => presentation(500, "STORAGE_ERROR", true, LogLevel::Error),
            AppError::InvalidInput(_) => presentation(400, "INVALID_INPUT", false, LogLevel::Debug),
            AppError::NotFound(_) => presentation(404, "NOT_FOUND", false, LogLevel::Debug),
            AppError::Configuration(_) => {
                presentation(500, "CONFIGURATION_ERROR", true, LogLevel::Error)
            }
        }
    }

    /// Variant name, reported next to details outside production.
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Storage(_) => "Storage",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::Configuration(_) => "Configuration",
        }
    }

    /// The error followed by its source chain, one cause per line.
    pub fn detailed_message(&self) -> String {
        use std::error::Error as _;

        const MAX_CAUSES: usize = 5;

        let mut causes = std::iter::successors(self.source(), |&e| e.source());
        let mut details = self.to_string();
        for cause in causes.by_ref().take(MAX_CAUSES) {
            details.push_str("\n  Caused by: ");
            details.push_str(&cause.to_string());
        }
        if causes.next().is_some() {
            details.push_str("\n  ...");
        }
        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.presentation().status
    }

    fn error_code(&self) -> &'static str {
        self.presentation().code
    }

    fn is_sensitive(&self) -> bool {
        self.presentation().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.presentation().level
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Database(_) => "Metadata store unavailable".to_string(),
            AppError::Storage(_) => "File storage unavailable".to_string(),
            AppError::Configuration(_) => "Service misconfigured".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_error_is_hidden() {
        #[cfg(feature = "sqlx")]
        let err = AppError::from(sqlx::Error::PoolClosed);
        #[cfg(not(feature = "sqlx"))]
        let err = AppError::Database("pool closed".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "DATABASE_ERROR");
        assert_eq!(err.client_message(), "Metadata store unavailable");
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_not_found_passes_message_through() {
        let err = AppError::NotFound("File not found: 42".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(err.client_message(), "File not found: 42");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_storage_error_hides_endpoint() {
        let err = AppError::Storage("connection refused to 10.0.0.3:9000".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "File storage unavailable");
        assert!(err.is_sensitive());
    }

    #[test]
    fn test_configuration_error_is_hidden() {
        let err = AppError::Configuration("FILE_GED_URL must be set".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
        assert_eq!(err.client_message(), "Service misconfigured");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_detailed_message_walks_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = AppError::from(sqlx::Error::Io(io));
        let details = err.detailed_message();
        assert!(details.starts_with("Database error: "));
        assert!(details.contains("Caused by: "));
        assert!(details.contains("connection refused"));
        assert_eq!(err.error_type(), "Database");
    }

    #[test]
    fn test_detailed_message_without_source_is_display() {
        let err = AppError::InvalidInput("No file provided".to_string());
        assert_eq!(err.detailed_message(), "Invalid input: No file provided");
    }
}
