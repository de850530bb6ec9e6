//! Client-held session context.
//!
//! Holds what a browser tab would keep in session storage: the active user
//! identifier and the metadata of a file travelling from the dashboard to the
//! upload view. Views receive it explicitly; the CLI persists it as JSON between
//! invocations.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::client::{ClientError, Result};
use crate::models::file::FileInfo;

pub const USER_ID_KEY: &str = "UserID";
pub const SELECTED_FILE_KEY: &str = "file";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    items: BTreeMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.items.insert(key.into(), value.into());
    }

    pub fn remove_item(&mut self, key: &str) -> Option<String> {
        self.items.remove(key)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get_item(USER_ID_KEY)
    }

    /// The current user id, or `NotLoggedIn`.
    pub fn require_user_id(&self) -> Result<&str> {
        self.user_id().ok_or(ClientError::NotLoggedIn)
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.set_item(USER_ID_KEY, user_id);
    }

    pub fn store_selected_file(&mut self, file: &FileInfo) -> Result<()> {
        let json = serde_json::to_string(file).map_err(|e| ClientError::Session(e.to_string()))?;
        self.set_item(SELECTED_FILE_KEY, json);
        Ok(())
    }

    pub fn selected_file(&self) -> Result<Option<FileInfo>> {
        self.get_item(SELECTED_FILE_KEY)
            .map(serde_json::from_str)
            .transpose()
            .map_err(|e| ClientError::Session(e.to_string()))
    }

    pub fn clear_selected_file(&mut self) {
        self.remove_item(SELECTED_FILE_KEY);
    }

    /// Loads a saved session; a missing file yields an empty session.
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|e| ClientError::Session(e.to_string()))
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_vec_pretty(self).map_err(|e| ClientError::Session(e.to_string()))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Ends the session and removes its file.
    pub async fn destroy(path: &Path) -> Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample_file() -> FileInfo {
        FileInfo {
            file_name: "q3 report.pdf".into(),
            description: "quarterly \"numbers\"".into(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 10, 30, 0).unwrap(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn selected_file_round_trips() {
        let mut session = Session::new();
        assert_eq!(session.selected_file().unwrap(), None);

        let file = sample_file();
        session.store_selected_file(&file).unwrap();
        assert_eq!(session.selected_file().unwrap(), Some(file));

        session.clear_selected_file();
        assert_eq!(session.selected_file().unwrap(), None);
    }

    #[test]
    fn corrupt_selected_file_is_a_session_error() {
        let mut session = Session::new();
        session.set_item(SELECTED_FILE_KEY, "{not json");
        assert!(matches!(
            session.selected_file(),
            Err(ClientError::Session(_))
        ));
    }

    #[test]
    fn require_user_id() {
        let mut session = Session::new();
        assert_eq!(session.require_user_id(), Err(ClientError::NotLoggedIn));
        session.set_user_id("42");
        assert_eq!(session.require_user_id(), Ok("42"));
    }

    #[tokio::test]
    async fn save_load_destroy() {
        let path = std::env::temp_dir().join(format!(
            "filedesk-session-test-{}.json",
            uuid::Uuid::new_v4()
        ));
        assert_eq!(Session::load(&path).await.unwrap(), Session::default());

        let mut session = Session::new();
        session.set_user_id("u-1");
        session.store_selected_file(&sample_file()).unwrap();
        session.save(&path).await.unwrap();

        let loaded = Session::load(&path).await.unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.selected_file().unwrap(), Some(sample_file()));

        Session::destroy(&path).await.unwrap();
        Session::destroy(&path).await.unwrap();
        assert_eq!(Session::load(&path).await.unwrap(), Session::default());
    }
}
