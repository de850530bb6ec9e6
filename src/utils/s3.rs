use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_config::ConfigLoader;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use aws_types::region::Region;

use crate::errors::AppError;
use crate::utils::storage::FileStorage;

pub async fn create_s3_client(region: Option<String>) -> S3Client {
    let aws_config = ConfigLoader::default()
        .region(region.map(Region::new))
        .behavior_version(BehaviorVersion::latest())
        .load()
        .await;

    S3Client::new(&aws_config)
}

pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub async fn from_env(bucket: String, region: Option<String>) -> Self {
        Self::new(create_s3_client(region).await, bucket)
    }
}

#[async_trait]
impl FileStorage for S3Storage {
    async fn put(&self, key: &str, content: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|err| {
                log::error!("S3 upload of {} failed: {:?}", key, err);
                AppError::AWSError(format!("Failed to upload file {}", key))
            })?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                log::error!("S3 delete of {} failed: {:?}", key, err);
                AppError::AWSError(format!("Failed to delete file {}", key))
            })?;
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|err| AppError::AWSError(err.to_string()))?;
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|err| {
                log::error!("S3 presign of {} failed: {:?}", key, err);
                AppError::AWSError(format!("Failed to presign file {}", key))
            })?;
        Ok(request.uri().to_string())
    }
}
