//! Typed HTTP client for the filedesk REST API.
//!
//! Every service wrapper joins the configured base URL with one of the
//! [`paths`] constants and issues exactly one request per call. Responses are
//! decoded into the shared [`crate::models`] shapes; failures are handed back
//! unchanged as [`ClientError`].

pub mod files;
pub mod login;
pub mod users;

use std::fmt;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::ErrorResponse;

pub use files::FilesService;
pub use login::LoginService;
pub use users::UserService;

/// Named path segments appended to the base URL.
pub mod paths {
    pub const UPLOAD: &str = "/users";
    pub const EDIT: &str = "/users";
    pub const DOWNLOAD: &str = "/users";
    pub const DELETE: &str = "/users";
    pub const GET_USER: &str = "/users";
    pub const REGISTER: &str = "/users";
    pub const LOGIN: &str = "/login";
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request never produced a response
    Network(String),

    /// Server answered with a non-success status; `message` is its text
    Api { status: u16, message: String },

    /// Response body did not match the expected shape
    Decode(String),

    /// Base URL or path could not be assembled
    InvalidUrl(String),

    /// Session state could not be read or written
    Session(String),

    Io(String),

    /// No user identifier in the session
    NotLoggedIn,

    /// Form failed client-side validation and was not submitted
    InvalidForm(String),

    /// File is not part of the loaded listing
    UnknownFile(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Network(msg) => write!(f, "Network error: {}", msg),
            ClientError::Api { message, .. } => write!(f, "{}", message),
            ClientError::Decode(msg) => write!(f, "Unexpected response: {}", msg),
            ClientError::InvalidUrl(msg) => write!(f, "Invalid URL: {}", msg),
            ClientError::Session(msg) => write!(f, "Session error: {}", msg),
            ClientError::Io(msg) => write!(f, "I/O error: {}", msg),
            ClientError::NotLoggedIn => write!(f, "Not logged in"),
            ClientError::InvalidForm(msg) => write!(f, "{}", msg),
            ClientError::UnknownFile(name) => write!(f, "No file named {}", name),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io(err.to_string())
    }
}

/// Base URL plus the shared `reqwest` client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// `{base}{path}/{segments...}?{query}` with each segment percent-encoded.
    pub(crate) fn url(&self, path: &str, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?;
            parts.pop_if_empty();
            parts.extend(path.split('/').filter(|s| !s.is_empty()));
            parts.extend(segments);
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// Sends the request and decodes a success body, or turns the error body into `Api`.
    pub(crate) async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        log::debug!("{} {}", status, response.url());

        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => err.message,
            Err(_) if !body.trim().is_empty() => body,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string(),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_path_and_segments() {
        let client = ApiClient::new("http://localhost:3000/v1").unwrap();
        let url = client
            .url(paths::UPLOAD, &["abc", "upload"], &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/v1/users/abc/upload");
    }

    #[test]
    fn url_tolerates_trailing_slash_and_encodes_query() {
        let client = ApiClient::new("http://localhost:3000/v1/").unwrap();
        let url = client
            .url(paths::DELETE, &["abc", "file"], &[("file", "my report&v2.pdf")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3000/v1/users/abc/file?file=my+report%26v2.pdf"
        );
        let pairs: Vec<_> = url.query_pairs().collect();
        assert_eq!(pairs[0].1, "my report&v2.pdf");
    }

    #[test]
    fn rejects_non_base_url() {
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidUrl(_))
        ));
        assert!(ApiClient::new("not a url").is_err());
    }

    #[test]
    fn api_error_displays_server_text_verbatim() {
        let err = ClientError::Api {
            status: 409,
            message: "Email already exists".into(),
        };
        assert_eq!(err.to_string(), "Email already exists");
    }
}
