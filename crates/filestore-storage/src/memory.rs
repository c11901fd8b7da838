//! In-memory object store for tests. Enabled by the `test-util` feature.

use crate::object_client::ObjectClient;
use crate::traits::{StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A call observed by [`InMemoryObjectClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObjectCall {
    BucketExists(String),
    CreateBucket(String),
    PutObject { bucket: String, key: String },
    GetObject { bucket: String, key: String },
}

#[derive(Debug, Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

#[derive(Default)]
struct State {
    buckets: HashMap<String, HashMap<String, StoredObject>>,
    calls: Vec<ObjectCall>,
}

/// Bucket -> key -> bytes map that records every call it receives.
#[derive(Clone, Default)]
pub struct InMemoryObjectClient {
    state: Arc<Mutex<State>>,
    fail_puts: Arc<AtomicBool>,
}

impl InMemoryObjectClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put_object` fail with `UploadFailed`.
    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// Place an object directly, creating the bucket if needed.
    pub async fn insert_object(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        let mut state = self.state.lock().await;
        state.buckets.entry(bucket.to_string()).or_default().insert(
            key.to_string(),
            StoredObject {
                data: data.into(),
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    pub async fn has_bucket(&self, bucket: &str) -> bool {
        self.state.lock().await.buckets.contains_key(bucket)
    }

    pub async fn object_keys(&self, bucket: &str) -> Vec<String> {
        let state = self.state.lock().await;
        let mut keys: Vec<String> = state
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    pub async fn content_type(&self, bucket: &str, key: &str) -> Option<String> {
        let state = self.state.lock().await;
        state
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.content_type.clone())
    }

    pub async fn calls(&self) -> Vec<ObjectCall> {
        self.state.lock().await.calls.clone()
    }
}

#[async_trait]
impl ObjectClient for InMemoryObjectClient {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        let mut state = self.state.lock().await;
        state.calls.push(ObjectCall::BucketExists(bucket.to_string()));
        Ok(state.buckets.contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(ObjectCall::CreateBucket(bucket.to_string()));
        state.buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<()> {
        let mut state = self.state.lock().await;
        state.calls.push(ObjectCall::PutObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated transport failure".to_string(),
            ));
        }

        let objects = state
            .buckets
            .get_mut(bucket)
            .ok_or_else(|| StorageError::BackendError(format!("NoSuchBucket: {}", bucket)))?;
        objects.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> StorageResult<Bytes> {
        let mut state = self.state.lock().await;
        state.calls.push(ObjectCall::GetObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        state
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(format!("{}/{}", bucket, key)))
    }
}
