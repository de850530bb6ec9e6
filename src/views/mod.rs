//! View controllers: form state bound to service calls.
//!
//! A view never renders anything itself. Every action returns what the front
//! end should do next: an optional [`Route`] to navigate to and an optional
//! [`Notification`] to flash.

pub mod dashboard;
pub mod login;
pub mod sign_up;
pub mod upload;

use std::fmt;
use std::time::Duration;

use crate::client::ClientError;

pub const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    /// Upload/edit view; `name` is set when editing an existing file.
    Upload { name: Option<String> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Primary,
    Warn,
}

/// Transient message shown for [`NOTIFICATION_DURATION`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Duration,
}

impl Notification {
    pub fn primary(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Primary,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: NotificationKind::Warn,
            duration: NOTIFICATION_DURATION,
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        Self::warn(err.to_string())
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Result of a view action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    pub navigate: Option<Route>,
    pub notification: Option<Notification>,
}

impl Outcome {
    pub fn notify(notification: Notification) -> Self {
        Self {
            navigate: None,
            notification: Some(notification),
        }
    }

    pub fn navigate_with(route: Route, notification: Notification) -> Self {
        Self {
            navigate: Some(route),
            notification: Some(notification),
        }
    }

    pub fn failed(err: &ClientError) -> Self {
        Self::notify(Notification::from_error(err))
    }
}
