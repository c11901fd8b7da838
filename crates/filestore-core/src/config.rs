//! Configuration module
//!
//! Settings for the file service: server, database pool, storage backend
//! selection and upload limits.

use std::env;
use std::str::FromStr;

use crate::storage_types::StorageType;

const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const SERVER_PORT: u16 = 8080;
const MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
const FS_UPLOAD_DIR: &str = "./uploads";
const GED_BUCKET: &str = "documents";
const GED_REGION: &str = "us-east-1";
const ALLOWED_EXTENSIONS: &str = "pdf,png,jpg,jpeg,txt,docx";

/// Base configuration shared by every service binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub environment: String,
}

/// File service configuration
#[derive(Clone, Debug)]
pub struct FileServiceConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_type: StorageType,
    pub fs_upload_dir: String,
    pub ged_url: Option<String>,
    pub ged_username: Option<String>,
    pub ged_password: Option<String>,
    pub ged_bucket: String,
    pub ged_region: String,
    // Upload limits
    pub allowed_extensions: Vec<String>,
    pub max_file_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<FileServiceConfig>);

impl Config {
    fn as_service(&self) -> &FileServiceConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_service().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = FileServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_service().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_service().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_service().database_url
    }

    pub fn storage_type(&self) -> StorageType {
        self.as_service().storage_type
    }

    pub fn fs_upload_dir(&self) -> &str {
        &self.as_service().fs_upload_dir
    }

    pub fn ged_url(&self) -> Option<&str> {
        self.as_service().ged_url.as_deref()
    }

    pub fn ged_username(&self) -> Option<&str> {
        self.as_service().ged_username.as_deref()
    }

    pub fn ged_password(&self) -> Option<&str> {
        self.as_service().ged_password.as_deref()
    }

    pub fn ged_bucket(&self) -> &str {
        &self.as_service().ged_bucket
    }

    pub fn ged_region(&self) -> &str {
        &self.as_service().ged_region
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.as_service().allowed_extensions
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_service().max_file_size_bytes
    }
}

/// Split a comma-separated allow-list, trimming and lowercasing entries.
pub fn parse_extension_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl FileServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            environment,
        };

        let storage_type = match var("FILE_STORAGE_TYPE") {
            Some(raw) => StorageType::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("FILE_STORAGE_TYPE is invalid: {}", e))?,
            None => StorageType::Fs,
        };

        let max_file_size_bytes = var("FILE_MAX_SIZE")
            .unwrap_or_else(|| MAX_FILE_SIZE_BYTES.to_string())
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("FILE_MAX_SIZE must be a number of bytes"))?;

        let allowed_extensions = parse_extension_list(
            &var("FILE_ALLOWED_EXTENSIONS").unwrap_or_else(|| ALLOWED_EXTENSIONS.to_string()),
        );

        Ok(FileServiceConfig {
            base,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_type,
            fs_upload_dir: var("FILE_FS_UPLOAD_DIR").unwrap_or_else(|| FS_UPLOAD_DIR.to_string()),
            ged_url: var("FILE_GED_URL"),
            ged_username: var("FILE_GED_USERNAME"),
            ged_password: var("FILE_GED_PASSWORD"),
            ged_bucket: var("FILE_GED_BUCKET").unwrap_or_else(|| GED_BUCKET.to_string()),
            ged_region: var("FILE_GED_REGION").unwrap_or_else(|| GED_REGION.to_string()),
            allowed_extensions,
            max_file_size_bytes,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("FILE_MAX_SIZE must be greater than zero"));
        }

        if self.allowed_extensions.is_empty() {
            return Err(anyhow::anyhow!(
                "FILE_ALLOWED_EXTENSIONS must list at least one extension"
            ));
        }

        match self.storage_type {
            StorageType::Fs => {
                if self.fs_upload_dir.trim().is_empty() {
                    return Err(anyhow::anyhow!(
                        "FILE_FS_UPLOAD_DIR must be set when using FS storage"
                    ));
                }
            }
            StorageType::Db => {}
            StorageType::Ged => {
                let url = self.ged_url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("FILE_GED_URL must be set when using GED storage")
                })?;
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(anyhow::anyhow!(
                        "FILE_GED_URL must start with http:// or https://"
                    ));
                }
                if self.ged_username.is_none() || self.ged_password.is_none() {
                    return Err(anyhow::anyhow!(
                        "FILE_GED_USERNAME and FILE_GED_PASSWORD must be set when using GED storage"
                    ));
                }
                if self.ged_bucket.trim().is_empty() {
                    return Err(anyhow::anyhow!("FILE_GED_BUCKET must not be empty"));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<FileServiceConfig, anyhow::Error> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        FileServiceConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/files")]).unwrap();
        assert_eq!(config.storage_type, StorageType::Fs);
        assert_eq!(config.fs_upload_dir, "./uploads");
        assert_eq!(config.ged_bucket, "documents");
        assert_eq!(config.max_file_size_bytes, 10_485_760);
        assert_eq!(config.base.server_port, 8080);
        assert_eq!(
            config.allowed_extensions,
            vec!["pdf", "png", "jpg", "jpeg", "txt", "docx"]
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_database_url_fails() {
        let err = load(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_storage_type_is_case_insensitive() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_STORAGE_TYPE", "db"),
        ])
        .unwrap();
        assert_eq!(config.storage_type, StorageType::Db);
    }

    #[test]
    fn test_unknown_storage_type_fails() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_STORAGE_TYPE", "NFS"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("FILE_STORAGE_TYPE"));
    }

    #[test]
    fn test_allowed_extensions_are_trimmed_and_lowercased() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_ALLOWED_EXTENSIONS", " PDF , Txt,,png "),
        ])
        .unwrap();
        assert_eq!(config.allowed_extensions, vec!["pdf", "txt", "png"]);
    }

    #[test]
    fn test_ged_requires_endpoint_and_credentials() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_STORAGE_TYPE", "GED"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_STORAGE_TYPE", "GED"),
            ("FILE_GED_URL", "minio:9000"),
            ("FILE_GED_USERNAME", "minio"),
            ("FILE_GED_PASSWORD", "minio123"),
        ])
        .unwrap();
        assert!(config.validate().is_err());

        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_STORAGE_TYPE", "GED"),
            ("FILE_GED_URL", "http://minio:9000"),
            ("FILE_GED_USERNAME", "minio"),
            ("FILE_GED_PASSWORD", "minio123"),
        ])
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_max_size_is_rejected() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("FILE_MAX_SIZE", "0"),
        ])
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_detection() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/files"),
            ("APP_ENV", "prod"),
        ])
        .unwrap();
        assert!(Config(Box::new(config)).is_production());
    }
}
