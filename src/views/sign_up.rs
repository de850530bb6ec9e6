use validator::Validate;

use super::{Notification, Outcome, Route};
use crate::client::{ClientError, LoginService};
use crate::models::user::UserParams;

pub const REGISTERED_MESSAGE: &str = "User registered. Please login";

/// Normalises the raw admin control value: only the exact string `"true"` is truthy.
pub fn coerce_admin_flag(value: &str) -> bool {
    value == "true"
}

/// Raw sign-up form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct SignUpForm {
    #[validate(email(message = "Enter a valid email address"))]
    pub email_address: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    /// Value of the admin selector as the control reports it.
    pub is_admin: String,
}

impl SignUpForm {
    pub fn check(&self) -> Result<(), ClientError> {
        self.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .values()
                .flat_map(|errs| errs.iter())
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            messages.sort();
            ClientError::InvalidForm(messages.join("; "))
        })
    }

    pub fn to_params(&self) -> UserParams {
        UserParams {
            email_address: self.email_address.trim().to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            password: self.password.clone(),
            is_admin: coerce_admin_flag(&self.is_admin),
        }
    }
}

pub struct SignUpView {
    login: LoginService,
}

impl SignUpView {
    pub fn new(login: LoginService) -> Self {
        Self { login }
    }

    /// Submits a valid form. Success sends the user to the login view.
    pub async fn register(&self, form: &SignUpForm) -> Outcome {
        if let Err(err) = form.check() {
            return Outcome::failed(&err);
        }

        match self.login.register_user(&form.to_params()).await {
            Ok(response) if !response.email_address.is_empty() => {
                log::info!("Registered {}", response.email_address);
                Outcome::navigate_with(Route::Login, Notification::primary(REGISTERED_MESSAGE))
            }
            Ok(_) => Outcome::default(),
            Err(err) => Outcome::failed(&err),
        }
    }
}
