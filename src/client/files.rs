use reqwest::multipart::{Form, Part};

use super::{paths, ApiClient, ClientError, Result};
use crate::models::file::{DownloadDescriptor, EditFileParams, FileParams, FileResponse};

#[derive(Debug, Clone)]
pub struct FilesService {
    api: ApiClient,
}

impl FilesService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// PUT `{base}/users/{id}/upload` with the file as multipart part `file`.
    pub async fn upload_file(&self, params: &FileParams) -> Result<FileResponse> {
        let url = self
            .api
            .url(paths::UPLOAD, &[params.user_id.as_str(), "upload"], &[])?;
        let part = Part::bytes(params.file.content.clone()).file_name(params.file.file_name.clone());
        let form = Form::new().part("file", part);
        log::debug!("PUT {} ({} bytes)", url, params.file.content.len());
        self.api.send(self.api.http().put(url).multipart(form)).await
    }

    /// PATCH `{base}/users/{id}/file-update?file={name}` with a `description` part.
    pub async fn edit_file(&self, params: &EditFileParams) -> Result<FileResponse> {
        let url = self.api.url(
            paths::EDIT,
            &[params.user_id.as_str(), "file-update"],
            &[("file", params.filename.as_str())],
        )?;
        let form = Form::new().text("description", params.description.clone());
        log::debug!("PATCH {}", url);
        self.api.send(self.api.http().patch(url).multipart(form)).await
    }

    /// GET `{base}/users/{id}/download?file={name}`.
    pub async fn download_file(&self, user_id: &str, file_name: &str) -> Result<DownloadDescriptor> {
        let url = self.api.url(
            paths::DOWNLOAD,
            &[user_id, "download"],
            &[("file", file_name)],
        )?;
        log::debug!("GET {}", url);
        self.api.send(self.api.http().get(url)).await
    }

    /// Fetches the object behind an http(s) presigned URL.
    pub async fn fetch_presigned(&self, descriptor: &DownloadDescriptor) -> Result<Vec<u8>> {
        let raw = descriptor
            .presigned_url
            .as_deref()
            .ok_or_else(|| ClientError::Decode("download descriptor has no presignedURL".into()))?;
        let url = url::Url::parse(raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "cannot fetch {} URL {}",
                url.scheme(),
                raw
            )));
        }

        let response = self.api.http().get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetch_presigned_rejects_non_http_urls() {
        let service = FilesService::new(ApiClient::new("http://localhost:3000/v1").unwrap());
        let descriptor = DownloadDescriptor {
            presigned_url: Some("memory://u/a.txt?expires_in=120".into()),
        };
        assert!(matches!(
            service.fetch_presigned(&descriptor).await,
            Err(ClientError::InvalidUrl(_))
        ));

        let empty = DownloadDescriptor::default();
        assert!(matches!(
            service.fetch_presigned(&empty).await,
            Err(ClientError::Decode(_))
        ));
    }
}
