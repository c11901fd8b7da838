//! Shared key layout for the disk and object-store backends.
//!
//! Key format: `{yyyy}/{MM}/{stored_name}`, using the UTC upload date.

use chrono::{DateTime, Utc};

/// Year/month folder for a timestamp, e.g. `2024/03`.
pub fn date_folder(at: DateTime<Utc>) -> String {
    at.format("%Y/%m").to_string()
}

/// Object key under the date folder.
pub fn object_key(at: DateTime<Utc>, stored_name: &str) -> String {
    format!("{}/{}", date_folder(at), stored_name)
}

/// Locator recorded for object-store files: `{bucket}/{key}`.
pub fn bucket_path(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, key)
}

/// Strip the `{bucket}/` prefix from a recorded locator.
pub fn key_from_bucket_path<'a>(bucket: &str, storage_path: &'a str) -> Option<&'a str> {
    storage_path
        .strip_prefix(bucket)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|key| !key.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_date_folder_is_zero_padded() {
        let at = Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap();
        assert_eq!(date_folder(at), "2024/03");
        assert_eq!(object_key(at, "a.txt_x.txt"), "2024/03/a.txt_x.txt");
    }

    #[test]
    fn test_key_from_bucket_path() {
        assert_eq!(
            key_from_bucket_path("documents", "documents/2024/03/a.txt"),
            Some("2024/03/a.txt")
        );
        assert_eq!(key_from_bucket_path("documents", "other/2024/03/a.txt"), None);
        assert_eq!(key_from_bucket_path("documents", "documentsX/a.txt"), None);
        assert_eq!(key_from_bucket_path("documents", "documents/"), None);
    }
}
