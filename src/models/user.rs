use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::file::{FileEntry, FileInfo};

/// Registration payload.
#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserParams {
    #[validate(email)]
    pub email_address: String,
    #[validate(length(min = 1, message = "first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Validate, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LoginParams {
    #[validate(email)]
    pub email_address: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct RegisterResponse {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub is_admin: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginResponse {
    #[serde(rename = "EmailAddress")]
    pub email_address: String,
    #[serde(rename = "UserID")]
    pub user_id: String,
    #[serde(rename = "IsAdmin")]
    pub is_admin: bool,
}

/// Profile of a single user together with the map of files it owns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    #[serde(rename = "UserID", default)]
    pub user_id: String,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    #[serde(rename = "IsAdmin", default)]
    pub is_admin: bool,
    #[serde(rename = "EmailAddress", default)]
    pub email_address: String,
    #[serde(default)]
    pub files: HashMap<String, FileInfo>,
}

/// One user of the all-users listing.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(
        rename = "password_SHA512",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub password_hash: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AllUsers {
    pub success: bool,
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}
