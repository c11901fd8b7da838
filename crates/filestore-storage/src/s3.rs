use crate::object_client::ObjectClient;
use crate::traits::{StorageError, StorageResult};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_bucket::HeadBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

/// S3-compatible object client (MinIO and friends).
#[derive(Clone)]
pub struct S3ObjectClient {
    client: Client,
}

impl S3ObjectClient {
    /// Build the client once at startup.
    ///
    /// # Arguments
    /// * `endpoint_url` - Object-store endpoint, e.g. "http://localhost:9000"
    /// * `access_key` / `secret_key` - Static credentials
    /// * `region` - Signing region; S3-compatible stores usually accept any value
    pub fn new(
        endpoint_url: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> StorageResult<Self> {
        if endpoint_url.trim().is_empty() {
            return Err(StorageError::ConfigError(
                "Object store endpoint URL is empty".to_string(),
            ));
        }
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(StorageError::ConfigError(
                "Object store credentials are missing".to_string(),
            ));
        }

        let credentials = Credentials::new(access_key, secret_key, None, None, "filestore-static");

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(endpoint_url)
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            // Path-style addressing is required for MinIO and most self-hosted stores
            .force_path_style(true)
            .retry_config(RetryConfig::disabled())
            .build();

        tracing::info!(endpoint = %endpoint_url, region = %region, "Object store client configured");

        Ok(S3ObjectClient {
            client: Client::from_conf(s3_config),
        })
    }
}

#[async_trait]
impl ObjectClient for S3ObjectClient {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service_err))
                if matches!(service_err.err(), HeadBucketError::NotFound(_)) =>
            {
                Ok(false)
            }
            Err(e) => {
                tracing::error!(error = %e, bucket = %bucket, "S3 head_bucket failed");
                Err(StorageError::BackendError(e.to_string()))
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => {
                tracing::info!(bucket = %bucket, "Bucket created");
                Ok(())
            }
            Err(SdkError::ServiceError(service_err))
                if matches!(
                    service_err.err(),
                    CreateBucketError::BucketAlreadyOwnedByYou(_)
                        | CreateBucketError::BucketAlreadyExists(_)
                ) =>
            {
                tracing::debug!(bucket = %bucket, "Bucket created concurrently, continuing");
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, bucket = %bucket, "S3 create_bucket failed");
                Err(StorageError::BackendError(e.to_string()))
            }
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                StorageError::UploadFailed(e.to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let start = std::time::Instant::now();

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| match &e {
                SdkError::ServiceError(service_err)
                    if matches!(service_err.err(), GetObjectError::NoSuchKey(_)) =>
                {
                    StorageError::NotFound(format!("{}/{}", bucket, key))
                }
                _ => {
                    tracing::error!(
                        error = %e,
                        bucket = %bucket,
                        key = %key,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 download failed"
                    );
                    StorageError::DownloadFailed(e.to_string())
                }
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| StorageError::DownloadFailed(e.to_string()))?
            .into_bytes();

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download successful"
        );

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_missing_credentials() {
        let err = S3ObjectClient::new("http://localhost:9000", "", "", "us-east-1")
            .err()
            .unwrap();
        assert!(matches!(err, StorageError::ConfigError(_)));
    }

    #[test]
    fn test_new_builds_without_network() {
        let client =
            S3ObjectClient::new("http://localhost:9000", "minio", "minio123", "us-east-1");
        assert!(client.is_ok());
    }
}
