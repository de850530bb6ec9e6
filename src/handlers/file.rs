use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use url::form_urlencoded;

use crate::errors::AppError;
use crate::models::file::{DownloadDescriptor, FileInfo, FileResponse};
use crate::models::user::DeleteResponse;
use crate::state::AppState;
use crate::utils::storage::object_key;
use crate::utils::validation::{check_description, check_file_name};

const FILE_KEY: &str = "file";
const DESCRIPTION_KEY: &str = "description";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Every `file` value of the query string, in order. `?file=a&file=b` names two files.
pub struct FileQuery {
    files: Vec<String>,
}

impl FileQuery {
    pub fn parse(query: &str) -> Self {
        let files = form_urlencoded::parse(query.as_bytes())
            .filter(|(key, _)| key == FILE_KEY)
            .map(|(_, value)| value.into_owned())
            .collect();
        Self { files }
    }

    /// Validated, de-duplicated file names, or a 400 naming what is missing.
    fn file_names(&self, action: &str, user_id: &str) -> Result<Vec<String>, AppError> {
        if self.files.is_empty() {
            return Err(AppError::bad_request(format!(
                "Failed to {} for user {}. Expected file key in query.",
                action, user_id
            )));
        }
        let mut names: Vec<String> = Vec::with_capacity(self.files.len());
        for raw in &self.files {
            if raw.is_empty() {
                return Err(AppError::bad_request(format!(
                    "Failed to {} for user {}. Expected file name in query.",
                    action, user_id
                )));
            }
            let name = check_file_name(raw)?;
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// First file name of the query.
    fn file_name(&self, action: &str, user_id: &str) -> Result<String, AppError> {
        self.file_names(action, user_id)?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::bad_request("Expected file name in query."))
    }
}

/// "File a.txt" or "Files a.txt, b.txt".
fn subject(file_names: &[String]) -> String {
    match file_names {
        [single] => format!("File {}", single),
        many => format!("Files {}", many.join(", ")),
    }
}

struct FormPart {
    name: String,
    filename: Option<String>,
    bytes: Vec<u8>,
}

/// Drains a multipart body, failing once the accumulated size passes `limit`.
async fn read_form(mut payload: Multipart, limit: usize) -> Result<Vec<FormPart>, AppError> {
    let mut parts = Vec::new();
    let mut total = 0usize;
    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {}", err)))?
    {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let filename = disposition.get_filename().map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|err| AppError::bad_request(format!("Invalid multipart body: {}", err)))?
        {
            total += chunk.len();
            if total > limit {
                return Err(size_error(limit));
            }
            bytes.extend_from_slice(&chunk);
        }
        parts.push(FormPart {
            name,
            filename,
            bytes,
        });
    }
    Ok(parts)
}

fn size_error(limit: usize) -> AppError {
    let limit = format_size(limit);
    AppError::bad_request_with(
        format!("File size greater than {}.", limit),
        format!("File size should be lesser than {}", limit),
    )
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB {
        format!("{} MB", bytes / MB)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{} bytes", bytes)
    }
}

pub async fn upload_file(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let mut user = state.get_user(&user_id).await?;
    let parts = read_form(payload, state.max_upload_bytes).await?;

    let part = parts
        .into_iter()
        .find(|p| p.name == FILE_KEY)
        .ok_or_else(|| AppError::bad_request("Failed to get form data from key file."))?;
    let file_name = check_file_name(part.filename.as_deref().unwrap_or_default())?;

    let content_type = infer::get(&part.bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or(DEFAULT_CONTENT_TYPE);
    log::info!(
        "Uploading {} ({} bytes, {}) for user {}",
        file_name,
        part.bytes.len(),
        content_type,
        user.user_id
    );

    state
        .storage
        .put(&object_key(user.user_id, &file_name), part.bytes, content_type)
        .await?;

    let now = Utc::now();
    user.files
        .entry(file_name.clone())
        .and_modify(|info| info.updated_at = now)
        .or_insert_with(|| FileInfo::new(file_name.clone(), now));
    state.users.save_files(user.user_id, &user.files).await?;

    Ok(HttpResponse::Ok().json(FileResponse::ok(format!(
        "File {} uploaded successfully",
        file_name
    ))))
}

pub async fn update_file_description(
    state: web::Data<AppState>,
    req: HttpRequest,
    user_id: web::Path<String>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let file_names =
        FileQuery::parse(req.query_string()).file_names("update file description", &user_id)?;
    let mut user = state.get_user(&user_id).await?;
    let parts = read_form(payload, state.max_upload_bytes).await?;

    let description = parts
        .into_iter()
        .find(|p| p.name == DESCRIPTION_KEY)
        .map(|p| String::from_utf8(p.bytes))
        .transpose()
        .map_err(|_| AppError::bad_request("File description must be valid UTF-8"))?
        .unwrap_or_default();
    check_description(&description)?;

    let now = Utc::now();
    for file_name in &file_names {
        let info = user.files.get_mut(file_name).ok_or_else(|| {
            AppError::bad_request_with(
                format!("Error file {} of user {} not found", file_name, user.user_id),
                "Check for file name",
            )
        })?;
        // only a single-file edit has to change something
        if file_names.len() == 1 && info.description == description {
            return Err(AppError::bad_request_with(
                format!("Error updating file {}", file_name),
                "Check file description",
            ));
        }
        info.description = description.clone();
        info.updated_at = now;
    }
    state.users.save_files(user.user_id, &user.files).await?;
    log::info!(
        "Updated description of {} for user {}",
        file_names.join(", "),
        user.user_id
    );

    Ok(HttpResponse::Ok().json(FileResponse::ok(format!(
        "{} description updated successfully",
        subject(&file_names)
    ))))
}

pub async fn download_file(
    state: web::Data<AppState>,
    req: HttpRequest,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file_name = FileQuery::parse(req.query_string()).file_name("download file", &user_id)?;
    let user = state.get_user(&user_id).await?;
    if !user.files.contains_key(&file_name) {
        return Err(AppError::bad_request_with(
            format!("File {} not found for user {}", file_name, user.user_id),
            "Ensure that the file name is correct",
        ));
    }

    let url = state
        .storage
        .presign_get(&object_key(user.user_id, &file_name), state.presign_expiry)
        .await?;
    Ok(HttpResponse::Ok().json(DownloadDescriptor {
        presigned_url: Some(url),
    }))
}

/// Deletes every named file or none of them.
pub async fn delete_file(
    state: web::Data<AppState>,
    req: HttpRequest,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let file_names = FileQuery::parse(req.query_string()).file_names("delete file", &user_id)?;
    let mut user = state.get_user(&user_id).await?;
    for file_name in &file_names {
        if user.files.remove(file_name).is_none() {
            return Err(AppError::bad_request_with(
                format!("File not found {} for user {}", file_name, user.user_id),
                "Check the file name",
            ));
        }
    }

    for file_name in &file_names {
        state
            .storage
            .delete(&object_key(user.user_id, file_name))
            .await?;
    }
    state.users.save_files(user.user_id, &user.files).await?;
    log::info!("Deleted {} for user {}", file_names.join(", "), user.user_id);

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: format!("{} deleted successfully", subject(&file_names)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_collects_every_file_value() {
        let query = FileQuery::parse("file=a.txt&other=x&file=my+report%26v2.pdf&file=a.txt");
        assert_eq!(
            query.file_names("delete file", "u").unwrap(),
            ["a.txt", "my report&v2.pdf"]
        );
        assert_eq!(query.file_name("download file", "u").unwrap(), "a.txt");
    }

    #[test]
    fn query_without_usable_names_is_rejected() {
        let err = FileQuery::parse("other=x").file_names("delete file", "u").unwrap_err();
        assert!(err.message().contains("Expected file key in query"));

        let err = FileQuery::parse("file=a.txt&file=").file_names("delete file", "u").unwrap_err();
        assert!(err.message().contains("Expected file name in query"));

        assert!(FileQuery::parse("file=a%2Fb").file_names("delete file", "u").is_err());
    }

    #[test]
    fn subject_names_one_or_many_files() {
        assert_eq!(subject(&["a.txt".to_string()]), "File a.txt");
        assert_eq!(
            subject(&["a.txt".to_string(), "b.txt".to_string()]),
            "Files a.txt, b.txt"
        );
    }

    #[test]
    fn size_limits_read_in_the_largest_whole_unit() {
        assert_eq!(format_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_size(512 * 1024), "512 KB");
        assert_eq!(format_size(4), "4 bytes");
        assert_eq!(
            size_error(4).message(),
            "File size greater than 4 bytes."
        );
    }
}
