//! Dashboard shell: section navigation, profile, sidebar and dropdown.
//!
//! Holds handles to the chat and camera controllers it coordinates. They
//! are built once by the app and passed in; nothing is looked up globally.

use std::cell::RefCell;
use std::rc::Rc;

use companion_types::{event::CompanionEvent, profile::UserProfile};
use crate::camera::CameraController;
use crate::chat::ChatController;
use crate::event_bus::EventBus;
use crate::ports::{BackendPort, CameraPort};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Chat,
    Camera,
    Wellness,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Chat, Section::Camera, Section::Wellness];

    pub fn label(&self) -> &'static str {
        match self {
            Section::Chat => "Chat",
            Section::Camera => "Emotion Camera",
            Section::Wellness => "Wellness",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Section::Chat => "💬",
            Section::Camera => "📷",
            Section::Wellness => "🌿",
        }
    }
}

pub struct Dashboard {
    section: Section,
    profile: Option<UserProfile>,
    sidebar_open: bool,
    dropdown_open: bool,
    chat: Rc<RefCell<ChatController>>,
    camera: Rc<RefCell<CameraController>>,
    events: EventBus,
}

impl Dashboard {
    pub fn new(
        chat: Rc<RefCell<ChatController>>,
        camera: Rc<RefCell<CameraController>>,
        events: EventBus,
    ) -> Self {
        Self {
            section: Section::default(),
            profile: None,
            sidebar_open: false,
            dropdown_open: false,
            chat,
            camera,
            events,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn chat(&self) -> &Rc<RefCell<ChatController>> {
        &self.chat
    }

    pub fn camera(&self) -> &Rc<RefCell<CameraController>> {
        &self.camera
    }

    /// Show `section`. Leaving the camera section stops the camera.
    /// Returns `true` if the camera was stopped (the caller drops its
    /// sampling interval).
    pub fn switch_section(&mut self, section: Section, camera_port: &dyn CameraPort) -> bool {
        let leaving_camera = self.section == Section::Camera && section != Section::Camera;
        self.section = section;
        self.sidebar_open = false;
        if leaving_camera {
            return self.camera.borrow_mut().stop(camera_port);
        }
        false
    }

    // ─── Chrome ──────────────────────────────────────────────

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    pub fn close_sidebar(&mut self) {
        self.sidebar_open = false;
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn logout(&mut self) {
        self.dropdown_open = false;
        self.events.emit(CompanionEvent::Redirect {
            path: "/logout".to_string(),
            delay_ms: 0,
        });
    }

    // ─── Profile ─────────────────────────────────────────────

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn display_name(&self) -> &str {
        self.profile
            .as_ref()
            .map(UserProfile::display_name)
            .unwrap_or("User")
    }

    pub fn initials(&self) -> String {
        companion_types::profile::initials(self.display_name())
    }

    /// Failures are logged only; the header keeps its placeholder.
    pub async fn load_profile(this: &RefCell<Self>, backend: &dyn BackendPort) {
        match backend.profile().await {
            Ok(profile) => this.borrow_mut().profile = Some(profile),
            Err(e) => log::error!("Error loading user info: {}", e),
        }
    }

    /// Everything the dashboard fetches when it first mounts.
    pub async fn load_startup(this: &RefCell<Self>, backend: &dyn BackendPort) {
        Self::load_profile(this, backend).await;
        let chat = this.borrow().chat.clone();
        ChatController::refresh_sessions(&chat, backend).await;
    }
}
