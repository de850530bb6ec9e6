use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{UserRecord, UserRepository};
use crate::errors::AppError;
use crate::models::file::FileInfo;

#[derive(Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }
        users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, AppError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let mut users: Vec<UserRecord> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(users)
    }

    async fn save_files(
        &self,
        user_id: Uuid,
        files: &BTreeMap<String, FileInfo>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;
        user.files = files.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(email: &str) -> UserRecord {
        UserRecord {
            user_id: Uuid::new_v4(),
            email: email.to_string(),
            first_name: "Ada".into(),
            last_name: "Byron".into(),
            is_admin: false,
            password_hash: "hash".into(),
            files: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email_ignoring_case() {
        let repo = MemoryUserRepository::default();
        repo.create_user(record("ada@example.com")).await.unwrap();
        let err = repo.create_user(record("ADA@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn save_files_replaces_map() {
        let repo = MemoryUserRepository::default();
        let user = repo.create_user(record("ada@example.com")).await.unwrap();
        let mut files = BTreeMap::new();
        files.insert("a.txt".to_string(), FileInfo::new("a.txt", Utc::now()));
        repo.save_files(user.user_id, &files).await.unwrap();

        let stored = repo.find_by_id(user.user_id).await.unwrap().unwrap();
        assert_eq!(stored.files.len(), 1);
        assert!(repo
            .find_by_email("ADA@EXAMPLE.COM")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn save_files_for_unknown_user_is_not_found() {
        let repo = MemoryUserRepository::default();
        let err = repo
            .save_files(Uuid::new_v4(), &BTreeMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
