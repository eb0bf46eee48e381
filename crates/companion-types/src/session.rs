use serde::{Deserialize, Serialize};
use crate::message::ChatMessage;

/// Summary of a backend chat session, as shown in the session list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSessionRef {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message_count: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ChatSessionRef {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => "New Chat",
        }
    }

    /// Relative age label: "Today", "Yesterday", "N days ago", or the date.
    pub fn age_label(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        let Some(created) = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
        else {
            return String::new();
        };

        let diff_ms = (now - created).num_milliseconds().unsigned_abs();
        let days = diff_ms.div_ceil(86_400_000);
        match days {
            0 | 1 => "Today".to_string(),
            2 => "Yesterday".to_string(),
            3..=7 => format!("{} days ago", days),
            _ => created.format("%Y-%m-%d").to_string(),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<chrono::DateTime<chrono::Utc>> {
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&chrono::Utc));
    }
    // HTTP-date, as produced by some JSON encoders for datetimes
    chrono::DateTime::parse_from_rfc2822(raw)
        .ok()
        .map(|t| t.with_timezone(&chrono::Utc))
}

/// `GET /chat/sessions`: wrapped or bare list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SessionListResponse {
    Wrapped { sessions: Vec<ChatSessionRef> },
    Bare(Vec<ChatSessionRef>),
}

impl SessionListResponse {
    pub fn into_sessions(self) -> Vec<ChatSessionRef> {
        match self {
            SessionListResponse::Wrapped { sessions } => sessions,
            SessionListResponse::Bare(sessions) => sessions,
        }
    }
}

/// `GET /chat/sessions/{id}/messages`: wrapped or bare list
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageListResponse {
    Wrapped { messages: Vec<ChatMessage> },
    Bare(Vec<ChatMessage>),
}

impl MessageListResponse {
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            MessageListResponse::Wrapped { messages } => messages,
            MessageListResponse::Bare(messages) => messages,
        }
    }
}
