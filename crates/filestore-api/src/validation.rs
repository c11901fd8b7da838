//! Upload validation applied before a file reaches the storage layer.

use filestore_core::Config;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File is empty")]
    EmptyFile,

    #[error("Maximum file size exceeded")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file name")]
    InvalidFilename,

    #[error("Extension not allowed: {0}")]
    ExtensionNotAllowed(String),
}

/// Size and extension allow-list checks, in that order.
#[derive(Debug, Clone)]
pub struct FileValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl FileValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.max_file_size_bytes(),
            config.allowed_extensions().to_vec(),
        )
    }

    pub fn validate(&self, filename: &str, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        let extension = match filename.rfind('.') {
            Some(idx) => filename[idx + 1..].to_lowercase(),
            None => return Err(ValidationError::InvalidFilename),
        };

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::ExtensionNotAllowed(extension));
        }

        Ok(())
    }
}
