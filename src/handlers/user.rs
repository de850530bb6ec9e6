use std::collections::BTreeMap;

use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::models::file::FileInfo;
use crate::models::user::AllUsers;
use crate::state::AppState;

pub async fn get_user(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = state.get_user(&user_id).await?;
    Ok(HttpResponse::Ok().json(user.to_response()))
}

pub async fn get_all_users(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let users = state.users.list_users().await?;
    Ok(HttpResponse::Ok().json(AllUsers {
        success: true,
        users: users.iter().map(|u| u.to_summary()).collect(),
    }))
}

/// File maps of every user, one entry per user.
pub async fn get_all_files(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let files: Vec<BTreeMap<String, FileInfo>> = state
        .users
        .list_users()
        .await?
        .into_iter()
        .map(|u| u.files)
        .collect();
    Ok(HttpResponse::Ok().json(files))
}
