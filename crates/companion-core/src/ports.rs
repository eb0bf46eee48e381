//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `companion-core` (pure Rust).
//! Implementations live in `companion-platform` (browser adapters).
//! Controllers never touch `fetch`, `localStorage` or `getUserMedia`
//! directly; they only see these traits.

use async_trait::async_trait;
use companion_types::{
    Result,
    auth::{LoginRequest, OAuthProvider, RegisterRequest},
    emotion::EmotionResult,
    message::{ChatMessage, ChatReply, ChatRequest},
    profile::UserProfile,
    session::ChatSessionRef,
    wellness::{MindfulnessPrompt, Reminder},
};

// ─── Backend Port ────────────────────────────────────────────

/// The companion backend's HTTP surface.
///
/// Every method maps to one endpoint. Non-2xx responses come back as
/// `CompanionError::Backend` carrying the body's `error` text when present.
#[async_trait(?Send)]
pub trait BackendPort {
    /// `POST /login`
    async fn login(&self, req: &LoginRequest) -> Result<()>;

    /// `POST /register`
    async fn register(&self, req: &RegisterRequest) -> Result<()>;

    /// `POST /auth/guest`
    async fn guest_login(&self) -> Result<()>;

    /// URL of the redirect-based OAuth handoff, `GET /auth/{provider}`
    fn oauth_url(&self, provider: OAuthProvider) -> String;

    /// `GET /profile`
    async fn profile(&self) -> Result<UserProfile>;

    /// `GET /chat/sessions`
    async fn list_sessions(&self) -> Result<Vec<ChatSessionRef>>;

    /// `GET /chat/sessions/{id}/messages`
    async fn session_messages(&self, session_id: &str) -> Result<Vec<ChatMessage>>;

    /// `DELETE /chat/sessions/{id}`
    async fn delete_session(&self, session_id: &str) -> Result<()>;

    /// `POST /chat`
    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatReply>;

    /// `POST /emotions/analyze-image` with a JPEG data URL
    async fn analyze_image(&self, data_url: &str) -> Result<Vec<EmotionResult>>;

    /// `GET /wellness/reminders`
    async fn reminders(&self) -> Result<Vec<Reminder>>;

    /// `GET /wellness/mindfulness`
    async fn mindfulness_prompt(&self) -> Result<MindfulnessPrompt>;

    /// `POST /meditation/start`, returns the backend session id
    async fn start_meditation(&self, duration_minutes: u32) -> Result<String>;

    /// `POST /meditation/complete/{id}`
    async fn complete_meditation(&self, session_id: &str) -> Result<()>;
}

// ─── Storage Port ────────────────────────────────────────────

/// Client-local string key/value store (the browser's `localStorage` shape).
#[async_trait(?Send)]
pub trait StoragePort {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn delete(&self, key: &str) -> Result<()>;

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}

// ─── Camera Port ─────────────────────────────────────────────

/// Identifies one granted media stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamHandle(pub u64);

/// An RGBA snapshot of the bound stream, row-major, 4 bytes per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// A video capture device bound to an off-screen frame source.
///
/// Granting and binding are separate steps: several `open` requests may
/// be pending at once, and only the caller knows which grant is still
/// wanted. A granted stream is held until it is bound or released.
#[async_trait(?Send)]
pub trait CameraPort {
    /// Ask for camera access. Resolves once the user granted (or denied)
    /// permission.
    async fn open(&self, width: u32, height: u32) -> Result<StreamHandle>;

    /// Make `stream` the frame source, stopping the previously bound one.
    fn bind(&self, stream: StreamHandle) -> Result<()>;

    /// Stop the tracks of one stream, bound or not.
    fn release_stream(&self, stream: StreamHandle);

    /// Encode the current frame as a `data:image/jpeg` URL.
    /// `Ok(None)` while the stream has no decodable frame yet.
    fn capture_frame(&self, jpeg_quality: f64) -> Result<Option<String>>;

    /// Raw pixels of the current frame for the on-screen preview.
    fn preview_frame(&self) -> Result<Option<PreviewFrame>> {
        Ok(None)
    }

    /// Stop the bound stream's tracks. Safe to call when nothing is open.
    fn release(&self);

    fn is_open(&self) -> bool;
}
