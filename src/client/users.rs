use super::{paths, ApiClient, Result};
use crate::models::user::{AllUsers, DeleteResponse, UserResponse};

#[derive(Debug, Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get_user_details(&self, user_id: &str) -> Result<UserResponse> {
        let url = self.api.url(paths::GET_USER, &[user_id], &[])?;
        log::debug!("GET {}", url);
        self.api.send(self.api.http().get(url)).await
    }

    pub async fn get_all_users(&self) -> Result<AllUsers> {
        let url = self.api.url(paths::GET_USER, &[], &[])?;
        log::debug!("GET {}", url);
        self.api.send(self.api.http().get(url)).await
    }

    pub async fn delete_file(&self, user_id: &str, file_name: &str) -> Result<DeleteResponse> {
        let url = self
            .api
            .url(paths::DELETE, &[user_id, "file"], &[("file", file_name)])?;
        log::debug!("DELETE {}", url);
        self.api.send(self.api.http().delete(url)).await
    }
}
