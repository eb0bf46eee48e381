use serde::{Deserialize, Serialize};

/// The two timed practices the wellness modals can launch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Meditation,
    Mindfulness,
}

impl PracticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            PracticeKind::Meditation => "Meditation Session",
            PracticeKind::Mindfulness => "Mindfulness Practice",
        }
    }

    /// Whether the backend tracks this practice (start/complete calls)
    pub fn is_backend_tracked(&self) -> bool {
        matches!(self, PracticeKind::Meditation)
    }

    pub fn completed_message(&self) -> &'static str {
        match self {
            PracticeKind::Meditation => "Meditation session completed! Well done!",
            PracticeKind::Mindfulness => "Mindfulness practice completed! Great job!",
        }
    }

    pub fn stopped_message(&self) -> &'static str {
        match self {
            PracticeKind::Meditation => "Meditation session stopped",
            PracticeKind::Mindfulness => "Mindfulness practice stopped",
        }
    }

    pub fn stop_label(&self) -> &'static str {
        match self {
            PracticeKind::Meditation => "Stop Session",
            PracticeKind::Mindfulness => "Stop Practice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PracticePhase {
    NotStarted,
    Running,
    Completed,
    Stopped,
}

/// Render seconds as `MM:SS`. Minutes are not wrapped at 60.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
