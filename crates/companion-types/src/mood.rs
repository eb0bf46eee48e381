use serde::{Deserialize, Serialize};

/// Local storage key holding the JSON array of mood entries
pub const MOOD_ENTRIES_KEY: &str = "moodEntries";

pub const MOOD_SCALE_MIN: u8 = 1;
pub const MOOD_SCALE_MAX: u8 = 10;
pub const MOOD_SCALE_DEFAULT: u8 = 5;

/// A mood journal record. Append-only, never edited after save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: u8,
    pub energy: u8,
    pub stress: u8,
    #[serde(default)]
    pub notes: String,
    pub timestamp: String,
}

/// Slider and notes state of the mood journal modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodForm {
    pub mood: u8,
    pub energy: u8,
    pub stress: u8,
    pub notes: String,
}

impl Default for MoodForm {
    fn default() -> Self {
        Self {
            mood: MOOD_SCALE_DEFAULT,
            energy: MOOD_SCALE_DEFAULT,
            stress: MOOD_SCALE_DEFAULT,
            notes: String::new(),
        }
    }
}

impl MoodForm {
    /// Snapshot the form as an entry stamped with the current time.
    /// Slider values outside the scale are clamped into it.
    pub fn to_entry(&self) -> MoodEntry {
        MoodEntry {
            mood: clamp_level(self.mood),
            energy: clamp_level(self.energy),
            stress: clamp_level(self.stress),
            notes: self.notes.clone(),
            timestamp: crate::message::now_rfc3339(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn clamp_level(v: u8) -> u8 {
    v.clamp(MOOD_SCALE_MIN, MOOD_SCALE_MAX)
}
