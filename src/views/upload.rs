use super::{Notification, Outcome, Route};
use crate::client::{ClientError, FilesService};
use crate::models::file::{EditFileParams, FileInfo, FileParams, FileResponse, UploadFile};
use crate::session::Session;

/// Upload a new file, or edit the description of the file picked on the dashboard.
pub struct UploadView {
    files: FilesService,
}

fn success_message(response: &FileResponse, fallback: &str) -> String {
    response.message().unwrap_or(fallback).to_string()
}

impl UploadView {
    pub fn new(files: FilesService) -> Self {
        Self { files }
    }

    /// File handed over by the dashboard, if the view was opened for editing.
    pub fn selected_file(&self, session: &Session) -> Result<Option<FileInfo>, ClientError> {
        session.selected_file()
    }

    pub async fn upload(&self, session: &Session, file: UploadFile) -> Outcome {
        let user_id = match session.require_user_id() {
            Ok(id) => id.to_string(),
            Err(err) => return Outcome::failed(&err),
        };
        let params = FileParams { user_id, file };

        match self.files.upload_file(&params).await {
            Ok(response) if response.success => Outcome::navigate_with(
                Route::Dashboard,
                Notification::primary(success_message(&response, "File uploaded")),
            ),
            Ok(response) => Outcome::notify(Notification::warn(success_message(
                &response,
                "Upload failed",
            ))),
            Err(err) => Outcome::failed(&err),
        }
    }

    /// Saves a new description for the selected file and returns to the dashboard.
    pub async fn save_description(&self, session: &mut Session, description: &str) -> Outcome {
        let user_id = match session.require_user_id() {
            Ok(id) => id.to_string(),
            Err(err) => return Outcome::failed(&err),
        };
        let selected = match session.selected_file() {
            Ok(Some(file)) => file,
            Ok(None) => {
                return Outcome::failed(&ClientError::InvalidForm(
                    "No file selected for editing".into(),
                ))
            }
            Err(err) => return Outcome::failed(&err),
        };

        let params = EditFileParams {
            user_id,
            description: description.to_string(),
            filename: selected.file_name,
        };
        match self.files.edit_file(&params).await {
            Ok(response) if response.success => {
                session.clear_selected_file();
                Outcome::navigate_with(
                    Route::Dashboard,
                    Notification::primary(success_message(&response, "File updated")),
                )
            }
            Ok(response) => Outcome::notify(Notification::warn(success_message(
                &response,
                "Update failed",
            ))),
            Err(err) => Outcome::failed(&err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiClient;

    fn view() -> UploadView {
        UploadView::new(FilesService::new(
            ApiClient::new("http://127.0.0.1:9/v1").unwrap(),
        ))
    }

    #[tokio::test]
    async fn save_description_needs_a_selected_file() {
        let mut session = Session::new();
        session.set_user_id("u-1");
        let outcome = view().save_description(&mut session, "new").await;
        assert_eq!(
            outcome.notification.unwrap().message,
            "No file selected for editing"
        );
        assert_eq!(outcome.navigate, None);
    }

    #[tokio::test]
    async fn upload_needs_a_user() {
        let outcome = view()
            .upload(&Session::new(), UploadFile::new("a.txt", b"hi".to_vec()))
            .await;
        assert_eq!(outcome.notification.unwrap().message, "Not logged in");
    }

    #[test]
    fn success_message_prefers_server_text() {
        assert_eq!(
            success_message(&FileResponse::ok("File a.txt uploaded successfully"), "x"),
            "File a.txt uploaded successfully"
        );
        let bare = FileResponse {
            success: true,
            data: None,
        };
        assert_eq!(success_message(&bare, "File uploaded"), "File uploaded");
    }
}
