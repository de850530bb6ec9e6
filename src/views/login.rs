use super::{Notification, Outcome, Route};
use crate::client::LoginService;
use crate::models::user::LoginParams;
use crate::session::Session;

pub struct LoginView {
    login: LoginService,
}

impl LoginView {
    pub fn new(login: LoginService) -> Self {
        Self { login }
    }

    /// On success the user id goes into the session and the dashboard opens.
    pub async fn submit(&self, session: &mut Session, email: &str, password: &str) -> Outcome {
        let params = LoginParams {
            email_address: email.trim().to_string(),
            password: password.to_string(),
        };
        match self.login.login(&params).await {
            Ok(response) => {
                session.clear();
                session.set_user_id(response.user_id);
                Outcome::navigate_with(
                    Route::Dashboard,
                    Notification::primary(format!("Logged in as {}", response.email_address)),
                )
            }
            Err(err) => Outcome::failed(&err),
        }
    }
}
