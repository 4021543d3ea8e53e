//! S3 object-store adapter

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use keyrotor_core::ObjectStore;
use keyrotor_domain::{ArtifactLocation, Result, RotationError};
use tracing::debug;

/// Object store over one S3 bucket
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a store over the given bucket
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self { client, bucket: bucket.into() }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<ArtifactLocation> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|err| {
                RotationError::Storage(format!("upload of {} failed: {}", key, err))
            })?;
        debug!(bucket = %self.bucket, key, "object stored");
        Ok(ArtifactLocation { bucket: self.bucket.clone(), key: key.to_string() })
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                RotationError::Storage(format!("download of {} failed: {}", key, err))
            })?;
        let data = output.body.collect().await.map_err(|err| {
            RotationError::Storage(format!("reading body of {} failed: {}", key, err))
        })?;
        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                RotationError::Storage(format!("deletion of {} failed: {}", key, err))
            })?;
        Ok(())
    }
}
