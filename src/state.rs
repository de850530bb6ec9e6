use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::config::ServerConfig;
use crate::db::{UserRecord, UserRepository};
use crate::errors::AppError;
use crate::utils::storage::FileStorage;

/// Shared by every actix worker through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub storage: Arc<dyn FileStorage>,
    pub max_upload_bytes: usize,
    pub presign_expiry: Duration,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        storage: Arc<dyn FileStorage>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            users,
            storage,
            max_upload_bytes: config.max_upload_bytes,
            presign_expiry: config.presign_expiry,
        }
    }

    /// Loads a user by the raw path parameter.
    pub async fn get_user(&self, raw_user_id: &str) -> Result<UserRecord, AppError> {
        let user_id = Uuid::parse_str(raw_user_id)
            .map_err(|_| AppError::bad_request(format!("Invalid user ID {}", raw_user_id)))?;
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("The given user {} doesn't exist", user_id)))
    }
}
