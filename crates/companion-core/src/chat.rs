//! Chat transcript and backend session tracking.
//!
//! Sends are optimistic: the user's message is appended before the request
//! goes out and is kept even if the request fails. Replies are tagged with
//! the transcript epoch they were issued under; switching sessions,
//! starting a new chat or clearing the transcript advances the epoch so a
//! late reply never lands in the wrong conversation.

use std::cell::RefCell;

use companion_types::{
    Result,
    event::{CompanionEvent, Notification},
    message::{ChatMessage, ChatReply, ChatRequest},
    session::ChatSessionRef,
};
use crate::epoch::{Epoch, EpochToken};
use crate::event_bus::EventBus;
use crate::ports::BackendPort;

/// An in-flight `POST /chat`
#[derive(Debug, Clone)]
pub struct SendTicket {
    pub token: EpochToken,
    pub request: ChatRequest,
}

pub struct ChatController {
    transcript: Vec<ChatMessage>,
    sessions: Vec<ChatSessionRef>,
    current_session: Option<String>,
    typing: bool,
    /// Session awaiting the user's delete confirmation
    pending_delete: Option<String>,
    confirm_clear: bool,
    epoch: Epoch,
    events: EventBus,
}

impl ChatController {
    pub fn new(events: EventBus) -> Self {
        Self {
            transcript: vec![ChatMessage::welcome()],
            sessions: Vec::new(),
            current_session: None,
            typing: false,
            pending_delete: None,
            confirm_clear: false,
            epoch: Epoch::new(),
            events,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn sessions(&self) -> &[ChatSessionRef] {
        &self.sessions
    }

    pub fn current_session(&self) -> Option<&str> {
        self.current_session.as_deref()
    }

    pub fn is_active(&self, session_id: &str) -> bool {
        self.current_session.as_deref() == Some(session_id)
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.as_deref()
    }

    pub fn is_confirming_clear(&self) -> bool {
        self.confirm_clear
    }

    /// Drop the transcript back to the welcome message and invalidate any
    /// in-flight reply.
    fn reset_transcript(&mut self) {
        self.transcript = vec![ChatMessage::welcome()];
        self.typing = false;
        self.epoch.advance();
    }

    // ─── Sending ─────────────────────────────────────────────

    /// Append the user's message optimistically and show the typing
    /// indicator. Blank input is ignored.
    pub fn begin_send(&mut self, text: &str) -> Option<SendTicket> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        self.transcript.push(ChatMessage::user(message));
        self.typing = true;
        Some(SendTicket {
            token: self.epoch.token(),
            request: ChatRequest {
                message: message.to_string(),
                session_id: self.current_session.clone(),
            },
        })
    }

    /// Apply the reply. Returns `true` when the session list should be
    /// refreshed.
    pub fn finish_send(&mut self, ticket: &SendTicket, result: Result<ChatReply>) -> bool {
        if !self.epoch.is_current(ticket.token) {
            log::debug!("Dropping chat reply for a superseded transcript");
            return false;
        }
        self.typing = false;

        match result {
            Ok(reply) => {
                let mut refresh = false;
                if let Some(id) = reply.session_id.filter(|id| !id.is_empty()) {
                    self.current_session = Some(id);
                    refresh = true;
                }
                self.transcript.push(ChatMessage::ai(reply.response, reply.emotion));
                refresh
            }
            Err(e) => {
                log::error!("Error sending message: {}", e);
                self.events
                    .notify(Notification::error(e.user_message("Failed to send message")));
                false
            }
        }
    }

    pub async fn send_message(this: &RefCell<Self>, backend: &dyn BackendPort, text: &str) {
        let Some(ticket) = this.borrow_mut().begin_send(text) else {
            return;
        };
        let result = backend.send_chat(&ticket.request).await;
        let refresh = this.borrow_mut().finish_send(&ticket, result);
        if refresh {
            Self::refresh_sessions(this, backend).await;
        }
    }

    // ─── Session list ────────────────────────────────────────

    /// Reload the session list. Failures only log; the old list stays.
    pub async fn refresh_sessions(this: &RefCell<Self>, backend: &dyn BackendPort) {
        match backend.list_sessions().await {
            Ok(sessions) => {
                let mut chat = this.borrow_mut();
                let count = sessions.len();
                chat.sessions = sessions;
                chat.events.emit(CompanionEvent::SessionsRefreshed { count });
            }
            Err(e) => log::warn!("Error loading chat sessions: {}", e),
        }
    }

    /// Switch the transcript to a stored session.
    pub async fn open_session(this: &RefCell<Self>, backend: &dyn BackendPort, session_id: &str) {
        let token = this.borrow().epoch.token();
        match backend.session_messages(session_id).await {
            Ok(messages) => {
                {
                    let mut chat = this.borrow_mut();
                    if !chat.epoch.is_current(token) {
                        log::debug!("Dropping messages for session {}: superseded", session_id);
                        return;
                    }
                    chat.epoch.advance();
                    chat.current_session = Some(session_id.to_string());
                    chat.transcript = messages;
                    chat.typing = false;
                }
                Self::refresh_sessions(this, backend).await;
            }
            Err(e) => log::error!("Error loading chat session {}: {}", session_id, e),
        }
    }

    pub async fn start_new_chat(this: &RefCell<Self>, backend: &dyn BackendPort) {
        {
            let mut chat = this.borrow_mut();
            chat.current_session = None;
            chat.reset_transcript();
            chat.events.notify(Notification::success("New chat started"));
        }
        Self::refresh_sessions(this, backend).await;
    }

    // ─── Delete / clear (confirmed) ──────────────────────────

    pub fn request_delete(&mut self, session_id: &str) {
        self.pending_delete = Some(session_id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the session the user just confirmed.
    pub async fn confirm_delete(this: &RefCell<Self>, backend: &dyn BackendPort) {
        let Some(session_id) = this.borrow_mut().pending_delete.take() else {
            return;
        };

        match backend.delete_session(&session_id).await {
            Ok(()) => {
                {
                    let mut chat = this.borrow_mut();
                    if chat.is_active(&session_id) {
                        chat.current_session = None;
                        chat.reset_transcript();
                    }
                    chat.events.notify(Notification::success("Chat session deleted"));
                }
                Self::refresh_sessions(this, backend).await;
            }
            Err(e) => {
                log::error!("Error deleting chat session {}: {}", session_id, e);
                this.borrow()
                    .events
                    .notify(Notification::error("Failed to delete chat session"));
            }
        }
    }

    pub fn request_clear(&mut self) {
        self.confirm_clear = true;
    }

    pub fn cancel_clear(&mut self) {
        self.confirm_clear = false;
    }

    /// Clear the visible transcript. The backend session stays selected.
    pub fn confirm_clear(&mut self) {
        if !self.confirm_clear {
            return;
        }
        self.confirm_clear = false;
        self.reset_transcript();
        self.events.notify(Notification::success("Chat cleared"));
    }
}
