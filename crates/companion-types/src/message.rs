use serde::{Deserialize, Serialize};

pub const WELCOME_MESSAGE: &str = "Hello! I'm your AI companion. I'm here to chat, help with your emotions, and support your wellness journey. How are you feeling today?";

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single entry in the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub sender: Sender,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::User,
            timestamp: now_rfc3339(),
            emotion: None,
        }
    }

    pub fn ai(content: impl Into<String>, emotion: Option<String>) -> Self {
        Self {
            content: content.into(),
            sender: Sender::Ai,
            timestamp: now_rfc3339(),
            emotion,
        }
    }

    /// The fixed greeting every fresh transcript starts with
    pub fn welcome() -> Self {
        Self::ai(WELCOME_MESSAGE, None)
    }

    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// `HH:MM` in local time, or the raw timestamp if it does not parse.
    pub fn time_label(&self) -> String {
        chrono::DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }
}

/// Body of `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
}

/// Successful reply from `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub emotion: Option<String>,
}

pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
