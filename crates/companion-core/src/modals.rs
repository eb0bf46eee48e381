//! Wellness modals and the local mood journal.

use std::cell::RefCell;
use std::rc::Rc;

use companion_types::{
    Result,
    config::TimingConfig,
    event::{CompanionEvent, Notification},
    mood::{MOOD_ENTRIES_KEY, MoodEntry, MoodForm},
    wellness::{MUSIC_LIBRARY, MUSIC_MOODS, Reminder, Track},
};
use crate::event_bus::EventBus;
use crate::ports::{BackendPort, StoragePort};

/// Shown until the backend prompt has loaded
pub const DEFAULT_MINDFULNESS_PROMPT: &str =
    "Notice five things you can see, four you can hear and three you can feel.";

pub const MEDITATION_MINUTES: &[u32] = &[5, 10, 15, 20, 30];
pub const MINDFULNESS_MINUTES: &[u32] = &[3, 5, 10, 15];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKind {
    MoodJournal,
    Music,
    /// Reminders plus the meditation launcher
    Wellness,
    Mindfulness,
}

impl ModalKind {
    pub fn title(&self) -> &'static str {
        match self {
            ModalKind::MoodJournal => "Mood Journal",
            ModalKind::Music => "Music Therapy",
            ModalKind::Wellness => "Wellness Center",
            ModalKind::Mindfulness => "Mindfulness",
        }
    }
}

/// Tracks for `mood`: same mood, plus everything in the meditation genre.
pub fn recommend(mood: &str) -> Vec<Track> {
    MUSIC_LIBRARY
        .iter()
        .filter(|t| t.mood == mood || t.genre == "meditation")
        .copied()
        .collect()
}

// ─── Mood journal ────────────────────────────────────────────

/// Append-only list of mood entries, one JSON array under `moodEntries`.
#[derive(Clone)]
pub struct MoodJournal {
    storage: Rc<dyn StoragePort>,
}

impl MoodJournal {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    pub async fn entries(&self) -> Result<Vec<MoodEntry>> {
        match self.storage.get(MOOD_ENTRIES_KEY).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Read-modify-write the whole array. Returns the new length.
    pub async fn append(&self, entry: MoodEntry) -> Result<usize> {
        let mut entries = self.entries().await?;
        entries.push(entry);
        let json = serde_json::to_string(&entries)?;
        self.storage.set(MOOD_ENTRIES_KEY, &json).await?;
        Ok(entries.len())
    }
}

// ─── Modal manager ───────────────────────────────────────────

pub struct ModalManager {
    open: Option<ModalKind>,
    pub mood_form: MoodForm,
    pub music_mood: String,
    recommendations: Vec<Track>,
    reminders: Vec<Reminder>,
    mindfulness_prompt: Option<String>,
    pub meditation_minutes: u32,
    pub mindfulness_minutes: u32,
    saving: bool,
    timing: TimingConfig,
    events: EventBus,
}

impl ModalManager {
    pub fn new(timing: TimingConfig, events: EventBus) -> Self {
        Self {
            open: None,
            mood_form: MoodForm::default(),
            music_mood: MUSIC_MOODS[0].to_string(),
            recommendations: Vec::new(),
            reminders: Vec::new(),
            mindfulness_prompt: None,
            meditation_minutes: 10,
            mindfulness_minutes: 5,
            saving: false,
            timing,
            events,
        }
    }

    pub fn current(&self) -> Option<ModalKind> {
        self.open
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.open == Some(kind)
    }

    /// Opening a modal replaces whichever one was showing.
    pub fn open(&mut self, kind: ModalKind) {
        self.open = Some(kind);
    }

    pub fn close(&mut self) {
        self.open = None;
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    // ─── Music ───────────────────────────────────────────────

    pub fn recommendations(&self) -> &[Track] {
        &self.recommendations
    }

    pub fn recommend(&mut self) {
        self.recommendations = recommend(&self.music_mood);
    }

    /// Playback is simulated: a toast now and another when the preview ends.
    pub fn play(&self, title: &str) {
        self.events.notify(Notification::info(format!("Now playing: {}", title)));
        self.events.emit(CompanionEvent::NotifyLater {
            notification: Notification::info("Music finished playing"),
            delay_ms: self.timing.music_preview_ms,
        });
    }

    // ─── Reminders ───────────────────────────────────────────

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub async fn load_reminders(this: &RefCell<Self>, backend: &dyn BackendPort) {
        let reminders = match backend.reminders().await {
            Ok(reminders) => reminders,
            Err(e) => {
                log::error!("Error loading wellness reminders: {}", e);
                Reminder::fallback()
            }
        };
        this.borrow_mut().reminders = reminders;
    }

    pub fn complete_reminder(&mut self, index: usize) {
        if index >= self.reminders.len() {
            return;
        }
        let reminder = self.reminders.remove(index);
        self.events.notify(Notification::success(format!(
            "Great job completing your {} reminder!",
            reminder.kind
        )));
    }

    // ─── Mindfulness ─────────────────────────────────────────

    pub fn mindfulness_prompt(&self) -> &str {
        self.mindfulness_prompt
            .as_deref()
            .unwrap_or(DEFAULT_MINDFULNESS_PROMPT)
    }

    pub async fn load_mindfulness_prompt(this: &RefCell<Self>, backend: &dyn BackendPort) {
        match backend.mindfulness_prompt().await {
            Ok(prompt) => this.borrow_mut().mindfulness_prompt = Some(prompt.text().to_string()),
            Err(e) => log::error!("Error loading mindfulness prompt: {}", e),
        }
    }

    // ─── Mood journal ────────────────────────────────────────

    /// Append the form as a new entry. On success the form resets to its
    /// defaults and the modal closes; on failure both stay as they were.
    pub async fn save_mood_entry(this: &RefCell<Self>, journal: &MoodJournal) {
        let entry = {
            let mut modals = this.borrow_mut();
            if modals.saving {
                return;
            }
            modals.saving = true;
            modals.mood_form.to_entry()
        };

        let result = journal.append(entry).await;

        let mut modals = this.borrow_mut();
        modals.saving = false;
        match result {
            Ok(count) => {
                log::info!("Mood entry saved ({} total)", count);
                modals.mood_form.reset();
                if modals.is_open(ModalKind::MoodJournal) {
                    modals.close();
                }
                modals.events.notify(Notification::success("Mood entry saved successfully!"));
            }
            Err(e) => {
                log::error!("Error saving mood entry: {}", e);
                modals.events.notify(Notification::error("Failed to save mood entry"));
            }
        }
    }

    /// Close the launcher after its practice started.
    pub fn practice_started(&mut self, from: ModalKind) {
        if self.is_open(from) {
            self.close();
        }
    }
}

