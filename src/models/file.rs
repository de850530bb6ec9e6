use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file as stored in a user's file map and shown in the dashboard table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub file_name: String,
    #[serde(default)]
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl FileInfo {
    pub fn new(file_name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            file_name: file_name.into(),
            description: String::new(),
            updated_at: now,
            created_at: now,
        }
    }
}

/// File row of the all-users listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub file_name: String,
    pub description: String,
    pub uploaded_date: DateTime<Utc>,
    pub modified_date: DateTime<Utc>,
    pub download_url: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileMessage {
    pub message: String,
}

/// Body returned by upload and edit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<FileMessage>,
}

impl FileResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(FileMessage {
                message: message.into(),
            }),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.message.as_str())
    }
}

/// Presigned download descriptor.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct DownloadDescriptor {
    #[serde(rename = "presignedURL", default, skip_serializing_if = "Option::is_none")]
    pub presigned_url: Option<String>,
}

/// Bytes of a file being uploaded, with the name it will be stored under.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }

    pub async fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
            })?
            .to_string();
        let content = tokio::fs::read(path).await?;
        Ok(Self { file_name, content })
    }
}

#[derive(Debug, Clone)]
pub struct FileParams {
    pub user_id: String,
    pub file: UploadFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditFileParams {
    pub user_id: String,
    pub description: String,
    pub filename: String,
}
