use super::{paths, ApiClient, Result};
use crate::models::user::{LoginParams, LoginResponse, RegisterResponse, UserParams};

#[derive(Debug, Clone)]
pub struct LoginService {
    api: ApiClient,
}

impl LoginService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register_user(&self, params: &UserParams) -> Result<RegisterResponse> {
        let url = self.api.url(paths::REGISTER, &[], &[])?;
        log::debug!("POST {}", url);
        self.api.send(self.api.http().post(url).json(params)).await
    }

    pub async fn login(&self, params: &LoginParams) -> Result<LoginResponse> {
        let url = self.api.url(paths::LOGIN, &[], &[])?;
        log::debug!("PUT {}", url);
        self.api.send(self.api.http().put(url).json(params)).await
    }
}
