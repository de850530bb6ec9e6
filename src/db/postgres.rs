use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{UserRecord, UserRepository};
use crate::errors::AppError;
use crate::models::file::FileInfo;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id UUID PRIMARY KEY,
    email TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    is_admin BOOLEAN NOT NULL DEFAULT FALSE,
    password TEXT NOT NULL,
    files JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at TIMESTAMPTZ NOT NULL
)"#;

const CREATE_EMAIL_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS users_email_lower_idx ON users (LOWER(email))";

const SELECT_USER: &str =
    "SELECT user_id, email, first_name, last_name, is_admin, password, files, created_at FROM users";

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    first_name: String,
    last_name: String,
    is_admin: bool,
    password: String,
    files: Json<BTreeMap<String, FileInfo>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            user_id: row.user_id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            is_admin: row.is_admin,
            password_hash: row.password,
            files: row.files.0,
            created_at: row.created_at,
        }
    }
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the users table when missing.
    pub async fn init(&self) -> Result<(), AppError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_EMAIL_INDEX).execute(&self.pool).await?;
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: UserRecord) -> Result<UserRecord, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (user_id, email, first_name, last_name, is_admin, password, files, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.user_id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_admin)
        .bind(&user.password_hash)
        .bind(Json(&user.files))
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(err) if is_unique_violation(&err) => {
                Err(AppError::Conflict("Email already exists".to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, user_id: Uuid) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("{} WHERE user_id = $1", SELECT_USER))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "{} WHERE LOWER(email) = LOWER($1)",
            SELECT_USER
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(UserRecord::from))
    }

    async fn list_users(&self) -> Result<Vec<UserRecord>, AppError> {
        let rows = sqlx::query_as::<_, UserRow>(&format!("{} ORDER BY created_at", SELECT_USER))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(UserRecord::from).collect())
    }

    async fn save_files(
        &self,
        user_id: Uuid,
        files: &BTreeMap<String, FileInfo>,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET files = $1 WHERE user_id = $2")
            .bind(Json(files))
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }
}
