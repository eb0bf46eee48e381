use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// A transient toast message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Error, message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Warning, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NotifyLevel::Info, message: message.into() }
    }
}

/// Events emitted by controllers.
/// The app drains these each frame and turns them into toasts and navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompanionEvent {
    /// Show a toast now
    Notify(Notification),

    /// Show a toast after a delay
    NotifyLater { notification: Notification, delay_ms: u32 },

    /// Navigate the browser to `path` after `delay_ms`
    Redirect { path: String, delay_ms: u32 },

    /// A backend session list refresh was requested
    SessionsRefreshed { count: usize },
}
