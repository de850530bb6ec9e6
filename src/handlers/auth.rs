use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::db::UserRecord;
use crate::errors::AppError;
use crate::models::user::{LoginParams, LoginResponse, UserParams};
use crate::state::AppState;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::validate_payload;

pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<UserParams>,
) -> Result<HttpResponse, AppError> {
    let params = req.into_inner();
    validate_payload(&params)?;

    let user = UserRecord {
        user_id: Uuid::new_v4(),
        email: params.email_address.trim().to_string(),
        first_name: params.first_name,
        last_name: params.last_name,
        is_admin: params.is_admin,
        password_hash: hash_password(&params.password)?,
        files: BTreeMap::new(),
        created_at: Utc::now(),
    };
    let created = state.users.create_user(user).await?;
    log::info!("Registered user {} ({})", created.user_id, created.email);

    Ok(HttpResponse::Created().json(created.to_register_response()))
}

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginParams>,
) -> Result<HttpResponse, AppError> {
    let params = req.into_inner();
    validate_payload(&params)?;

    let user = state
        .users
        .find_by_email(params.email_address.trim())
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "No user registered with email {}",
                params.email_address
            ))
        })?;
    verify_password(&params.password, &user.password_hash)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        email_address: user.email,
        user_id: user.user_id.to_string(),
        is_admin: user.is_admin,
    }))
}
