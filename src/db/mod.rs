pub mod memory;
pub mod postgres;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::file::{FileEntry, FileInfo};
use crate::models::user::{RegisterResponse, UserResponse, UserSummary};

pub use memory::MemoryUserRepository;
pub use postgres::PgUserRepository;

/// A user as persisted by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub password_hash: String,
    pub files: BTreeMap<String, FileInfo>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn to_response(&self) -> UserResponse {
        UserResponse {
            user_id: self.user_id.to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_admin: self.is_admin,
            email_address: self.email.clone(),
            files: self
                .files
                .iter()
                .map(|(name, info)| (name.clone(), info.clone()))
                .collect(),
        }
    }

    pub fn to_register_response(&self) -> RegisterResponse {
        RegisterResponse {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email_address: self.email.clone(),
            is_admin: self.is_admin,
        }
    }

    pub fn to_summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.user_id.to_string(),
            firstname: self.first_name.clone(),
            lastname: self.last_name.clone(),
            username: self.email.clone(),
            is_admin: self.is_admin,
            files: self
                .files
                .values()
                .map(|info| FileEntry {
                    file_name: info.file_name.clone(),
                    description: info.description.clone(),
                    uploaded_date: info.created_at,
                    modified_date: info.updated_at,
                    download_url: format!(
                        "/v1/users/{}/download?file={}",
                        self.user_id,
                        url::form_urlencoded::byte_serialize(info.file_name.as_bytes())
                            .collect::<String>()
                    ),
                })
                .collect(),
            password_hash: None,
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with `Conflict` if the email is taken.
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, AppError>;

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, AppError>;

    /// Case-insensitive lookup by email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError>;

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError>;

    /// Replaces the stored file map of a user.
    async fn save_files(
        &self,
        user_id: Uuid,
        files: &BTreeMap<String, FileInfo>,
    ) -> Result<(), AppError>;
}

/// Picks Postgres when a database URL is configured, the in-memory directory otherwise.
pub async fn create_repository(
    database_url: Option<&str>,
) -> Result<Arc<dyn UserRepository>, AppError> {
    match database_url {
        Some(url) => {
            let repo = PgUserRepository::connect(url).await?;
            repo.init().await?;
            log::info!("Using Postgres user directory");
            Ok(Arc::new(repo))
        }
        None => {
            log::warn!("DATABASE_URL not set, users are kept in memory");
            Ok(Arc::new(MemoryUserRepository::default()))
        }
    }
}
