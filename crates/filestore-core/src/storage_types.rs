use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Recorded on every file at store time and used at load time to locate the bytes.
/// It's defined in core because it's used in configuration, the database and the API.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "storage_type", rename_all = "UPPERCASE")
)]
#[serde(rename_all = "UPPERCASE")]
pub enum StorageType {
    /// Local filesystem
    Fs,
    /// Inline blob column in the metadata database
    Db,
    /// S3-compatible object store (GED)
    Ged,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Fs => "FS",
            StorageType::Db => "DB",
            StorageType::Ged => "GED",
        }
    }
}

impl FromStr for StorageType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "FS" => Ok(StorageType::Fs),
            "DB" => Ok(StorageType::Db),
            "GED" => Ok(StorageType::Ged),
            _ => Err(anyhow::anyhow!(
                "Invalid storage type: {} (expected FS, DB or GED)",
                s
            )),
        }
    }
}

impl Display for StorageType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
