use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        actions: Vec<String>,
    },
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    InternalServerError(String),
    DatabaseError(String),
    AWSError(String),
}

/// Error body returned by every failing route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(
        rename = "recommendedActions",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub recommended_actions: Vec<String>,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            actions: Vec::new(),
        }
    }

    pub fn bad_request_with(message: impl Into<String>, action: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            actions: vec![action.into()],
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::BadRequest { message, .. } => message,
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg)
            | AppError::AWSError(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::AWSError(msg) => write!(f, "AWS Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_)
            | AppError::DatabaseError(_)
            | AppError::AWSError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let recommended_actions = match self {
            AppError::BadRequest { actions, .. } => actions.clone(),
            _ => Vec::new(),
        };
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            message: self.message().to_string(),
            recommended_actions,
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("Database error: {:?}", err);
        AppError::DatabaseError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        let details = err
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let errors = errs
                    .iter()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}: [{}]", field, errors)
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::bad_request(format!("Validation failed: {}", details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn status_codes_follow_variant() {
        assert_eq!(AppError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::AWSError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn body_carries_message_and_actions() {
        let err = AppError::bad_request_with("bad name", "Use letters");
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.message, "bad name");
        assert_eq!(parsed.recommended_actions, vec!["Use letters".to_string()]);
    }
}
