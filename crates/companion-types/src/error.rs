use thiserror::Error;

/// Fallback text shown for transport failures.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompanionError {
    /// Rejected before any request was issued
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response; `message` is the body's `error` field when present
    #[error("HTTP {status}: {}", message.as_deref().unwrap_or("request failed"))]
    Backend { status: u16, message: Option<String> },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),

    #[error("{0}")]
    Other(String),
}

impl CompanionError {
    /// Text to put in front of the user for a failed action.
    ///
    /// Backend errors surface the server's message verbatim when it sent one,
    /// transport failures get the fixed network message, everything else
    /// falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            CompanionError::Validation(msg) => msg.clone(),
            CompanionError::Backend { message: Some(msg), .. } if !msg.is_empty() => msg.clone(),
            CompanionError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<serde_json::Error> for CompanionError {
    fn from(e: serde_json::Error) -> Self {
        CompanionError::Serialization(e.to_string())
    }
}
