//! UI-level state that drives rendering.
//!
//! Controllers own the domain state; this holds only what exists for the
//! screen: toasts, the chat input box and a status line. Updated each
//! frame by draining the EventBus.

use companion_types::event::{CompanionEvent, Notification, NotifyLevel};

/// A toast on screen
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub level: NotifyLevel,
    pub message: String,
    /// egui time (seconds) after which the toast is dropped
    pub expires_at: f64,
}

/// State visible to UI panels
pub struct UiState {
    pub toasts: Vec<Toast>,
    next_toast_id: u64,
    /// Toast lifetime in seconds
    toast_lifetime: f64,
    /// Chat input field content
    pub chat_input: String,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new(notification_ms: u32) -> Self {
        Self {
            toasts: Vec::new(),
            next_toast_id: 1,
            toast_lifetime: notification_ms as f64 / 1000.0,
            chat_input: String::new(),
            status_text: "Ready".to_string(),
        }
    }

    pub fn push_toast(&mut self, notification: Notification, now: f64) -> u64 {
        let id = self.next_toast_id;
        self.next_toast_id += 1;
        log::debug!("Toast {} [{:?}]: {}", id, notification.level, notification.message);
        self.toasts.push(Toast {
            id,
            level: notification.level,
            message: notification.message,
            expires_at: now + self.toast_lifetime,
        });
        id
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Drop expired toasts. Returns `true` if any are still showing.
    pub fn prune(&mut self, now: f64) -> bool {
        self.toasts.retain(|t| t.expires_at > now);
        !self.toasts.is_empty()
    }

    /// Process events from the EventBus.
    ///
    /// Toasts and status updates are applied here; events that need the
    /// browser (navigation, delayed toasts) are handed back to the caller.
    pub fn process_events(&mut self, events: Vec<CompanionEvent>, now: f64) -> Vec<CompanionEvent> {
        let mut deferred = Vec::new();
        for event in events {
            match event {
                CompanionEvent::Notify(notification) => {
                    self.push_toast(notification, now);
                }
                CompanionEvent::SessionsRefreshed { count } => {
                    self.status_text = match count {
                        0 => "No conversations yet".to_string(),
                        1 => "1 conversation".to_string(),
                        n => format!("{} conversations", n),
                    };
                }
                other @ (CompanionEvent::NotifyLater { .. } | CompanionEvent::Redirect { .. }) => {
                    deferred.push(other);
                }
            }
        }
        deferred
    }
}
