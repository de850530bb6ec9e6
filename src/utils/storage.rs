use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::errors::AppError;
use crate::utils::s3::S3Storage;

/// Object key of a user's file: `{user_id}/{file_name}`.
pub fn object_key(user_id: Uuid, file_name: &str) -> String {
    format!("{}/{}", user_id, file_name)
}

/// Blob store holding uploaded file contents.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn put(&self, key: &str, content: Vec<u8>, content_type: &str) -> Result<(), AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;

    /// Returns a time-limited URL the client can fetch the object from.
    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, AppError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryStorage {
    pub async fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl FileStorage for MemoryStorage {
    async fn put(&self, key: &str, content: Vec<u8>, content_type: &str) -> Result<(), AppError> {
        self.objects.write().await.insert(
            key.to_string(),
            StoredObject {
                content,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.objects.write().await.remove(key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<String, AppError> {
        if !self.objects.read().await.contains_key(key) {
            return Err(AppError::AWSError(format!("Object {} does not exist", key)));
        }
        Ok(format!(
            "memory://{}?expires_in={}",
            key,
            expires_in.as_secs()
        ))
    }
}

/// Picks S3 when a bucket is configured, the in-memory store otherwise.
pub async fn create_storage(config: &ServerConfig) -> Arc<dyn FileStorage> {
    match &config.s3_bucket {
        Some(bucket) => {
            log::info!("Storing files in S3 bucket {}", bucket);
            Arc::new(S3Storage::from_env(bucket.clone(), config.aws_region.clone()).await)
        }
        None => {
            log::warn!("AWS_S3_BUCKET not set, files are kept in memory");
            Arc::new(MemoryStorage::default())
        }
    }
}
