use serde::{Deserialize, Serialize};

/// A wellness nudge shown in the wellness modal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    #[serde(rename = "type", alias = "title", default)]
    pub kind: String,
    pub message: String,
}

impl Reminder {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.kind.as_str() {
            "hydration" => "💧",
            "movement" => "🚶",
            "breathing" => "🫁",
            "meditation" => "🧘",
            "sleep" => "😴",
            "nutrition" => "🥗",
            _ => "💡",
        }
    }

    /// Shown when the reminders endpoint cannot be reached
    pub fn fallback() -> Vec<Reminder> {
        vec![
            Reminder::new("hydration", "Remember to drink water!"),
            Reminder::new("movement", "Take a short walk or stretch"),
            Reminder::new("breathing", "Practice deep breathing exercises"),
        ]
    }
}

/// `GET /wellness/reminders`: bare list or `{reminders: [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReminderListResponse {
    Bare(Vec<Reminder>),
    Wrapped { reminders: Vec<Reminder> },
}

impl ReminderListResponse {
    pub fn into_reminders(self) -> Vec<Reminder> {
        match self {
            ReminderListResponse::Bare(r) => r,
            ReminderListResponse::Wrapped { reminders } => reminders,
        }
    }
}

/// `GET /wellness/mindfulness` response
#[derive(Debug, Clone, Deserialize)]
pub struct MindfulnessPromptResponse {
    pub prompt: MindfulnessPrompt,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MindfulnessPrompt {
    Text(String),
    Structured {
        #[serde(default)]
        title: Option<String>,
        instruction: String,
    },
}

impl MindfulnessPrompt {
    /// The sentence the user should focus on
    pub fn text(&self) -> &str {
        match self {
            MindfulnessPrompt::Text(t) => t,
            MindfulnessPrompt::Structured { instruction, .. } => instruction,
        }
    }
}

/// `POST /meditation/start` body
#[derive(Debug, Clone, Serialize)]
pub struct MeditationStartRequest {
    /// Minutes
    pub duration: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeditationStartResponse {
    pub session_id: String,
}

/// An entry of the built-in music library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Track {
    pub title: &'static str,
    pub artist: &'static str,
    pub genre: &'static str,
    pub mood: &'static str,
}

pub const MUSIC_LIBRARY: &[Track] = &[
    Track { title: "Calm Waters", artist: "Nature Sounds", genre: "ambient", mood: "calm" },
    Track { title: "Energize", artist: "Upbeat Collective", genre: "electronic", mood: "energetic" },
    Track { title: "Peaceful Mind", artist: "Meditation Masters", genre: "meditation", mood: "peaceful" },
    Track { title: "Happy Vibes", artist: "Joy Makers", genre: "pop", mood: "happy" },
    Track { title: "Stress Relief", artist: "Calm Sounds", genre: "ambient", mood: "relaxed" },
];

/// Moods the music modal lets the user pick from
pub const MUSIC_MOODS: &[&str] = &["calm", "energetic", "peaceful", "happy", "relaxed"];
