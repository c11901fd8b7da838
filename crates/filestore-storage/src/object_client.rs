//! Object-store client seam used by the GED backend.

use crate::traits::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Minimal bucket/object operations against an S3-compatible store.
///
/// Implementations never retry; a failed call surfaces immediately.
#[async_trait]
pub trait ObjectClient: Send + Sync {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Create a bucket. Succeeds if the bucket already exists.
    async fn create_bucket(&self, bucket: &str) -> StorageResult<()>;

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Fetch a whole object. A missing key fails with `NotFound`.
    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes>;
}
