#[cfg(test)]
mod tests {
    use crate::auth::*;
    use crate::camera::{CameraController, CameraState};
    use crate::chat::ChatController;
    use crate::dashboard::{Dashboard, Section};
    use crate::epoch::Epoch;
    use crate::event_bus::EventBus;
    use crate::modals::{ModalKind, ModalManager, MoodJournal, recommend};
    use crate::ports::*;
    use crate::practice::{PracticeRegister, TickOutcome};
    use companion_types::CompanionError;
    use companion_types::auth::*;
    use companion_types::config::{CameraConfig, TimingConfig};
    use companion_types::emotion::EmotionResult;
    use companion_types::event::{CompanionEvent, Notification, NotifyLevel};
    use companion_types::message::*;
    use companion_types::mood::MOOD_ENTRIES_KEY;
    use companion_types::practice::PracticeKind;
    use companion_types::profile::UserProfile;
    use companion_types::session::ChatSessionRef;
    use companion_types::wellness::{MindfulnessPrompt, Reminder};
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::{LocalPool, block_on};
    use futures::task::LocalSpawnExt;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    // ─── Mocks ───────────────────────────────────────────────

    /// Backend that records every call. With `failure` set, every
    /// fallible call returns that error.
    #[derive(Default)]
    struct MockBackend {
        failure: Option<CompanionError>,
        chat_session_id: Option<String>,
        sessions: Vec<ChatSessionRef>,
        /// When set, `start_meditation` waits on it before answering.
        meditation_gate: RefCell<Option<oneshot::Receiver<()>>>,
        calls: RefCell<Vec<String>>,
    }

    impl MockBackend {
        fn failing(error: CompanionError) -> Self {
            Self {
                failure: Some(error),
                ..Default::default()
            }
        }

        fn record<T>(&self, call: &str, ok: T) -> companion_types::Result<T> {
            self.calls.borrow_mut().push(call.to_string());
            match &self.failure {
                Some(e) => Err(e.clone()),
                None => Ok(ok),
            }
        }

        fn count(&self, call: &str) -> usize {
            self.calls.borrow().iter().filter(|c| c.as_str() == call).count()
        }

        fn total_calls(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    #[async_trait(?Send)]
    impl BackendPort for MockBackend {
        async fn login(&self, _req: &LoginRequest) -> companion_types::Result<()> {
            self.record("login", ())
        }

        async fn register(&self, _req: &RegisterRequest) -> companion_types::Result<()> {
            self.record("register", ())
        }

        async fn guest_login(&self) -> companion_types::Result<()> {
            self.record("guest_login", ())
        }

        fn oauth_url(&self, provider: OAuthProvider) -> String {
            provider.path()
        }

        async fn profile(&self) -> companion_types::Result<UserProfile> {
            self.record(
                "profile",
                UserProfile {
                    username: Some("ada lovelace".to_string()),
                    name: None,
                },
            )
        }

        async fn list_sessions(&self) -> companion_types::Result<Vec<ChatSessionRef>> {
            self.record("list_sessions", self.sessions.clone())
        }

        async fn session_messages(&self, _id: &str) -> companion_types::Result<Vec<ChatMessage>> {
            self.record(
                "session_messages",
                vec![ChatMessage::user("earlier"), ChatMessage::ai("stored reply", None)],
            )
        }

        async fn delete_session(&self, _id: &str) -> companion_types::Result<()> {
            self.record("delete_session", ())
        }

        async fn send_chat(&self, _req: &ChatRequest) -> companion_types::Result<ChatReply> {
            self.record(
                "send_chat",
                ChatReply {
                    response: "Hi".to_string(),
                    session_id: self.chat_session_id.clone(),
                    emotion: None,
                },
            )
        }

        async fn analyze_image(&self, _data_url: &str) -> companion_types::Result<Vec<EmotionResult>> {
            self.record("analyze_image", vec![EmotionResult::new("joy", 0.9)])
        }

        async fn reminders(&self) -> companion_types::Result<Vec<Reminder>> {
            self.record("reminders", vec![Reminder::new("sleep", "Wind down for bed")])
        }

        async fn mindfulness_prompt(&self) -> companion_types::Result<MindfulnessPrompt> {
            self.record("mindfulness_prompt", MindfulnessPrompt::Text("Breathe in".to_string()))
        }

        async fn start_meditation(&self, _minutes: u32) -> companion_types::Result<String> {
            let gate = self.meditation_gate.borrow_mut().take();
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            self.record("start_meditation", "M1".to_string())
        }

        async fn complete_meditation(&self, _id: &str) -> companion_types::Result<()> {
            self.record("complete_meditation", ())
        }
    }

    struct MockCamera {
        deny: bool,
        frame: Option<String>,
        open: Cell<bool>,
        releases: Cell<u32>,
    }

    impl MockCamera {
        fn ready() -> Self {
            Self {
                deny: false,
                frame: Some("data:image/jpeg;base64,AAAA".to_string()),
                open: Cell::new(false),
                releases: Cell::new(0),
            }
        }
    }

    #[async_trait(?Send)]
    impl CameraPort for MockCamera {
        async fn open(&self, _width: u32, _height: u32) -> companion_types::Result<StreamHandle> {
            if self.deny {
                return Err(CompanionError::Camera("NotAllowedError".to_string()));
            }
            Ok(StreamHandle(1))
        }

        fn bind(&self, _stream: StreamHandle) -> companion_types::Result<()> {
            self.open.set(true);
            Ok(())
        }

        fn release_stream(&self, _stream: StreamHandle) {}

        fn capture_frame(&self, _q: f64) -> companion_types::Result<Option<String>> {
            Ok(self.frame.clone())
        }

        fn release(&self) {
            self.open.set(false);
            self.releases.set(self.releases.get() + 1);
        }

        fn is_open(&self) -> bool {
            self.open.get()
        }
    }

    /// Camera whose permission prompts stay up until the test answers them.
    /// Every `open` parks on its own oneshot, resolved through `grant`.
    #[derive(Default)]
    struct GatedCamera {
        next: Cell<u64>,
        prompts: RefCell<Vec<oneshot::Sender<()>>>,
        granted: RefCell<Vec<StreamHandle>>,
        stopped: RefCell<Vec<StreamHandle>>,
        bound: Cell<Option<StreamHandle>>,
    }

    impl GatedCamera {
        /// Answer the `n`th prompt (0-based, in call order).
        fn grant(&self, n: usize) {
            let (tx, _) = oneshot::channel();
            let sender = std::mem::replace(&mut self.prompts.borrow_mut()[n], tx);
            let _ = sender.send(());
        }

        /// Streams that were granted but neither bound nor stopped.
        fn leaked(&self) -> Vec<StreamHandle> {
            let stopped = self.stopped.borrow();
            self.granted
                .borrow()
                .iter()
                .copied()
                .filter(|s| !stopped.contains(s) && self.bound.get() != Some(*s))
                .collect()
        }
    }

    #[async_trait(?Send)]
    impl CameraPort for GatedCamera {
        async fn open(&self, _width: u32, _height: u32) -> companion_types::Result<StreamHandle> {
            let handle = StreamHandle(self.next.get() + 1);
            self.next.set(handle.0);
            let (tx, rx) = oneshot::channel();
            self.prompts.borrow_mut().push(tx);
            rx.await
                .map_err(|_| CompanionError::Camera("Prompt dismissed".to_string()))?;
            self.granted.borrow_mut().push(handle);
            Ok(handle)
        }

        fn bind(&self, stream: StreamHandle) -> companion_types::Result<()> {
            if let Some(previous) = self.bound.replace(Some(stream)) {
                self.stopped.borrow_mut().push(previous);
            }
            Ok(())
        }

        fn release_stream(&self, stream: StreamHandle) {
            if self.bound.get() == Some(stream) {
                self.release();
            } else {
                self.stopped.borrow_mut().push(stream);
            }
        }

        fn capture_frame(&self, _q: f64) -> companion_types::Result<Option<String>> {
            Ok(None)
        }

        fn release(&self) {
            if let Some(stream) = self.bound.take() {
                self.stopped.borrow_mut().push(stream);
            }
        }

        fn is_open(&self) -> bool {
            self.bound.get().is_some()
        }
    }

    #[derive(Default)]
    struct MockStorage {
        data: RefCell<HashMap<String, String>>,
        read_only: bool,
    }

    #[async_trait(?Send)]
    impl StoragePort for MockStorage {
        async fn get(&self, key: &str) -> companion_types::Result<Option<String>> {
            Ok(self.data.borrow().get(key).cloned())
        }

        async fn set(&self, key: &str, value: &str) -> companion_types::Result<()> {
            if self.read_only {
                return Err(CompanionError::Storage("QuotaExceededError".to_string()));
            }
            self.data.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        async fn delete(&self, key: &str) -> companion_types::Result<()> {
            self.data.borrow_mut().remove(key);
            Ok(())
        }

        fn backend_name(&self) -> &str {
            "mock"
        }
    }

    fn notifications(bus: &EventBus) -> Vec<Notification> {
        bus.drain()
            .into_iter()
            .filter_map(|e| match e {
                CompanionEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    fn messages(bus: &EventBus) -> Vec<String> {
        notifications(bus).into_iter().map(|n| n.message).collect()
    }

    fn session(id: &str) -> ChatSessionRef {
        ChatSessionRef {
            id: id.to_string(),
            title: None,
            message_count: 0,
            created_at: None,
        }
    }

    // ─── EventBus / Epoch ────────────────────────────────────

    #[test]
    fn test_event_bus_emit_and_drain() {
        let bus = EventBus::new();
        bus.notify(Notification::info("one"));
        bus.emit(CompanionEvent::SessionsRefreshed { count: 2 });
        assert!(bus.has_pending());
        assert_eq!(bus.drain().len(), 2);
        assert!(!bus.has_pending());
    }

    #[test]
    fn test_event_bus_clone_shares_state() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();
        bus1.notify(Notification::success("saved"));
        assert_eq!(messages(&bus2), vec!["saved"]);
        assert!(!bus1.has_pending());
    }

    #[test]
    fn test_epoch_advance_invalidates() {
        let mut epoch = Epoch::new();
        let old = epoch.token();
        assert!(epoch.is_current(old));
        let new = epoch.advance();
        assert!(!epoch.is_current(old));
        assert!(epoch.is_current(new));
        assert_eq!(new.value(), old.value() + 1);
    }

    // ─── Auth ────────────────────────────────────────────────

    fn auth(mode: AuthMode) -> (RefCell<AuthController>, EventBus) {
        let bus = EventBus::new();
        (RefCell::new(AuthController::new(mode, TimingConfig::default(), bus.clone())), bus)
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@b.co"));
    }

    #[test]
    fn test_register_short_password_makes_no_request() {
        let (ctl, _bus) = auth(AuthMode::Register);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.email = "ada@example.com".to_string();
            c.password = "12345".to_string();
        }
        let backend = MockBackend::default();
        block_on(AuthController::submit(&ctl, &backend));

        assert_eq!(backend.total_calls(), 0);
        let c = ctl.borrow();
        assert!(!c.is_submitting());
        assert_eq!(c.alerts()[0].message, "Password must be at least 6 characters long");
    }

    #[test]
    fn test_register_malformed_email_makes_no_request() {
        let (ctl, _bus) = auth(AuthMode::Register);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.email = "not-an-email".to_string();
            c.password = "longenough".to_string();
        }
        let backend = MockBackend::default();
        block_on(AuthController::submit(&ctl, &backend));

        assert_eq!(backend.total_calls(), 0);
        assert_eq!(ctl.borrow().alerts()[0].message, "Please enter a valid email address");
    }

    #[test]
    fn test_login_requires_all_fields() {
        let err = validate_login("  ", "pw").unwrap_err();
        assert_eq!(err, CompanionError::Validation("Please fill in all fields".to_string()));
        let ok = validate_login(" ada ", " pw ").unwrap();
        assert_eq!(ok.username, "ada");
        assert_eq!(ok.password, " pw ");
    }

    #[test]
    fn test_login_success_redirects_home() {
        let (ctl, bus) = auth(AuthMode::Login);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.password = "secret".to_string();
        }
        let backend = MockBackend::default();
        block_on(AuthController::submit(&ctl, &backend));

        assert_eq!(backend.count("login"), 1);
        assert_eq!(ctl.borrow().alerts()[0].level, NotifyLevel::Success);
        assert_eq!(
            bus.drain(),
            vec![CompanionEvent::Redirect { path: "/".to_string(), delay_ms: 1500 }]
        );
    }

    #[test]
    fn test_register_success_redirects_to_login() {
        let (ctl, bus) = auth(AuthMode::Register);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.email = "ada@example.com".to_string();
            c.password = "secret1".to_string();
        }
        let backend = MockBackend::default();
        block_on(AuthController::submit(&ctl, &backend));

        assert_eq!(backend.count("register"), 1);
        assert_eq!(
            bus.drain(),
            vec![CompanionEvent::Redirect { path: "/login".to_string(), delay_ms: 2000 }]
        );
    }

    #[test]
    fn test_login_failure_surfaces_server_error() {
        let (ctl, bus) = auth(AuthMode::Login);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.password = "wrong".to_string();
        }
        let backend = MockBackend::failing(CompanionError::Backend {
            status: 401,
            message: Some("Invalid credentials".to_string()),
        });
        block_on(AuthController::submit(&ctl, &backend));

        assert_eq!(ctl.borrow().alerts()[0].message, "Invalid credentials");
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_login_network_failure_message() {
        let (ctl, _bus) = auth(AuthMode::Login);
        {
            let mut c = ctl.borrow_mut();
            c.username = "ada".to_string();
            c.password = "pw".to_string();
        }
        let backend = MockBackend::failing(CompanionError::Network("offline".to_string()));
        block_on(AuthController::submit(&ctl, &backend));
        assert_eq!(ctl.borrow().alerts()[0].message, "Network error. Please try again.");
    }

    #[test]
    fn test_submit_locked_while_in_flight() {
        let (ctl, _bus) = auth(AuthMode::Login);
        let mut c = ctl.borrow_mut();
        c.username = "ada".to_string();
        c.password = "pw".to_string();
        assert!(c.begin_submit().is_some());
        assert!(c.is_submitting());
        assert!(c.begin_submit().is_none());
    }

    #[test]
    fn test_password_score_is_monotonic() {
        let ladder = ["", "a", "abcdefgh", "abcdefgH", "abcdefH1", "abcdeH1!"];
        let scores: Vec<u8> = ladder.iter().map(|p| score_password(p)).collect();
        assert_eq!(scores, vec![0, 1, 2, 3, 4, 5]);
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_password_score_labels() {
        let labels: Vec<&str> = (0..=5).map(|s| PasswordStrength::from_score(s).label()).collect();
        assert_eq!(labels, vec!["Very Weak", "Very Weak", "Weak", "Fair", "Good", "Strong"]);
        assert!(score_password("ÄÖÜ äöü 123 !!! long long long") <= 5);
    }

    #[test]
    fn test_strength_meter_only_on_register() {
        let (login, _) = auth(AuthMode::Login);
        assert!(login.borrow().password_strength().is_none());
        let (register, _) = auth(AuthMode::Register);
        register.borrow_mut().password = "Abcdefg1!".to_string();
        assert_eq!(
            register.borrow().password_strength(),
            Some((5, PasswordStrength::Strong))
        );
    }

    #[test]
    fn test_guest_login_success_and_failure() {
        let (ctl, bus) = auth(AuthMode::Login);
        block_on(AuthController::guest_login(&ctl, &MockBackend::default()));
        let events = bus.drain();
        assert_eq!(
            events[0],
            CompanionEvent::Notify(Notification::success("Guest session created successfully!"))
        );
        assert!(matches!(events[1], CompanionEvent::Redirect { ref path, delay_ms: 1500 } if path == "/"));

        let failing = MockBackend::failing(CompanionError::Network("offline".to_string()));
        block_on(AuthController::guest_login(&ctl, &failing));
        assert_eq!(messages(&bus), vec!["Failed to create guest session. Please try again."]);
        assert!(!ctl.borrow().is_guest_pending());
    }

    #[test]
    fn test_oauth_redirects_to_provider() {
        let (ctl, bus) = auth(AuthMode::Login);
        ctl.borrow().oauth(&MockBackend::default(), OAuthProvider::Github);
        let events = bus.drain();
        assert_eq!(events[0], CompanionEvent::Notify(Notification::info("Redirecting to Github...")));
        assert_eq!(
            events[1],
            CompanionEvent::Redirect { path: "/auth/github".to_string(), delay_ms: 0 }
        );
    }

    // ─── Chat ────────────────────────────────────────────────

    fn chat() -> (RefCell<ChatController>, EventBus) {
        let bus = EventBus::new();
        (RefCell::new(ChatController::new(bus.clone())), bus)
    }

    #[test]
    fn test_chat_starts_with_welcome() {
        let (ctl, _) = chat();
        let c = ctl.borrow();
        assert_eq!(c.transcript(), &[ChatMessage::welcome()][..]);
        assert!(c.current_session().is_none());
    }

    #[test]
    fn test_blank_message_ignored() {
        let (ctl, _) = chat();
        let backend = MockBackend::default();
        block_on(ChatController::send_message(&ctl, &backend, "   "));
        assert_eq!(backend.total_calls(), 0);
        assert_eq!(ctl.borrow().transcript().len(), 1);
    }

    #[test]
    fn test_reply_session_id_adopted_and_list_refreshed() {
        let (ctl, bus) = chat();
        let backend = MockBackend {
            chat_session_id: Some("S1".to_string()),
            sessions: vec![session("S1")],
            ..Default::default()
        };
        block_on(ChatController::send_message(&ctl, &backend, " hello "));

        let c = ctl.borrow();
        assert_eq!(c.current_session(), Some("S1"));
        assert_eq!(backend.count("list_sessions"), 1);
        assert_eq!(c.sessions().len(), 1);
        assert!(!c.is_typing());
        let contents: Vec<&str> = c.transcript().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents[1..], ["hello", "Hi"]);
        assert!(bus.drain().contains(&CompanionEvent::SessionsRefreshed { count: 1 }));
    }

    #[test]
    fn test_reply_without_session_id_skips_refresh() {
        let (ctl, _) = chat();
        let backend = MockBackend::default();
        block_on(ChatController::send_message(&ctl, &backend, "hello"));
        assert_eq!(backend.count("list_sessions"), 0);
        assert!(ctl.borrow().current_session().is_none());
    }

    #[test]
    fn test_send_failure_keeps_optimistic_message() {
        let (ctl, bus) = chat();
        let backend = MockBackend::failing(CompanionError::Backend { status: 500, message: None });
        block_on(ChatController::send_message(&ctl, &backend, "hello"));

        let c = ctl.borrow();
        assert!(!c.is_typing());
        assert_eq!(c.transcript().len(), 2);
        assert!(c.transcript()[1].is_user());
        assert_eq!(messages(&bus), vec!["Failed to send message"]);
    }

    #[test]
    fn test_late_reply_after_clear_is_dropped() {
        let (ctl, _) = chat();
        let mut c = ctl.borrow_mut();
        let ticket = c.begin_send("hello").unwrap();
        c.request_clear();
        c.confirm_clear();

        let reply = ChatReply {
            response: "late".to_string(),
            session_id: Some("S9".to_string()),
            emotion: None,
        };
        assert!(!c.finish_send(&ticket, Ok(reply)));
        assert_eq!(c.transcript(), &[ChatMessage::welcome()][..]);
        assert!(c.current_session().is_none());
    }

    #[test]
    fn test_delete_active_session_restores_welcome() {
        let (ctl, bus) = chat();
        let backend = MockBackend {
            chat_session_id: Some("S1".to_string()),
            ..Default::default()
        };
        block_on(ChatController::send_message(&ctl, &backend, "hello"));
        bus.drain();

        ctl.borrow_mut().request_delete("S1");
        block_on(ChatController::confirm_delete(&ctl, &backend));

        let c = ctl.borrow();
        assert_eq!(c.transcript(), &[ChatMessage::welcome()][..]);
        assert!(c.current_session().is_none());
        assert!(c.pending_delete().is_none());
        assert_eq!(messages(&bus), vec!["Chat session deleted"]);
    }

    #[test]
    fn test_delete_other_session_keeps_transcript() {
        let (ctl, _) = chat();
        let backend = MockBackend {
            chat_session_id: Some("S1".to_string()),
            ..Default::default()
        };
        block_on(ChatController::send_message(&ctl, &backend, "hello"));
        let before = ctl.borrow().transcript().to_vec();

        ctl.borrow_mut().request_delete("S2");
        block_on(ChatController::confirm_delete(&ctl, &backend));

        assert_eq!(ctl.borrow().transcript(), &before[..]);
        assert_eq!(ctl.borrow().current_session(), Some("S1"));
    }

    #[test]
    fn test_delete_without_confirmation_does_nothing() {
        let (ctl, _) = chat();
        let backend = MockBackend::default();
        block_on(ChatController::confirm_delete(&ctl, &backend));
        ctl.borrow_mut().request_delete("S1");
        ctl.borrow_mut().cancel_delete();
        block_on(ChatController::confirm_delete(&ctl, &backend));
        assert_eq!(backend.count("delete_session"), 0);
    }

    #[test]
    fn test_delete_failure_notifies() {
        let (ctl, bus) = chat();
        let backend = MockBackend::failing(CompanionError::Network("offline".to_string()));
        ctl.borrow_mut().request_delete("S1");
        block_on(ChatController::confirm_delete(&ctl, &backend));
        assert_eq!(messages(&bus), vec!["Failed to delete chat session"]);
    }

    #[test]
    fn test_open_session_replaces_transcript() {
        let (ctl, _) = chat();
        let backend = MockBackend::default();
        block_on(ChatController::open_session(&ctl, &backend, "S7"));
        let c = ctl.borrow();
        assert_eq!(c.current_session(), Some("S7"));
        assert_eq!(c.transcript().len(), 2);
        assert_eq!(c.transcript()[1].content, "stored reply");
        assert_eq!(backend.count("list_sessions"), 1);
    }

    #[test]
    fn test_new_chat_resets() {
        let (ctl, bus) = chat();
        let backend = MockBackend {
            chat_session_id: Some("S1".to_string()),
            ..Default::default()
        };
        block_on(ChatController::send_message(&ctl, &backend, "hello"));
        bus.drain();
        block_on(ChatController::start_new_chat(&ctl, &backend));
        assert!(ctl.borrow().current_session().is_none());
        assert_eq!(ctl.borrow().transcript().len(), 1);
        assert_eq!(messages(&bus), vec!["New chat started"]);
    }

    #[test]
    fn test_clear_keeps_session() {
        let (ctl, bus) = chat();
        let backend = MockBackend {
            chat_session_id: Some("S1".to_string()),
            ..Default::default()
        };
        block_on(ChatController::send_message(&ctl, &backend, "hello"));
        bus.drain();
        let mut c = ctl.borrow_mut();
        c.confirm_clear();
        assert_eq!(c.transcript().len(), 3, "clear needs confirmation");
        c.request_clear();
        c.confirm_clear();
        assert_eq!(c.transcript().len(), 1);
        assert_eq!(c.current_session(), Some("S1"));
        assert_eq!(messages(&bus), vec!["Chat cleared"]);
    }

    // ─── Camera ──────────────────────────────────────────────

    fn camera() -> (RefCell<CameraController>, EventBus) {
        let bus = EventBus::new();
        (RefCell::new(CameraController::new(CameraConfig::default(), bus.clone())), bus)
    }

    fn started(port: &MockCamera) -> (RefCell<CameraController>, EventBus) {
        let (ctl, bus) = camera();
        assert!(block_on(CameraController::start(&ctl, port)));
        bus.drain();
        (ctl, bus)
    }

    #[test]
    fn test_camera_start_success() {
        let (ctl, bus) = camera();
        let port = MockCamera::ready();
        assert!(block_on(CameraController::start(&ctl, &port)));
        assert_eq!(ctl.borrow().state(), CameraState::Active);
        assert!(port.is_open());
        assert_eq!(messages(&bus), vec!["Camera started successfully"]);
    }

    #[test]
    fn test_camera_start_denied_stays_idle() {
        let (ctl, bus) = camera();
        let port = MockCamera { deny: true, ..MockCamera::ready() };
        assert!(!block_on(CameraController::start(&ctl, &port)));
        assert_eq!(ctl.borrow().state(), CameraState::Idle);
        assert!(!ctl.borrow().is_opening());
        assert_eq!(messages(&bus), vec!["Failed to access camera"]);
    }

    #[test]
    fn test_no_sample_while_idle() {
        let (ctl, _) = camera();
        let port = MockCamera::ready();
        let backend = MockBackend::default();
        assert!(ctl.borrow_mut().begin_sample().is_none());
        block_on(CameraController::sample_tick(&ctl, &port, &backend));
        assert_eq!(backend.count("analyze_image"), 0);
    }

    #[test]
    fn test_single_inference_in_flight() {
        let port = MockCamera::ready();
        let (ctl, _) = started(&port);
        let backend = MockBackend::default();

        let first = ctl.borrow_mut().begin_sample();
        assert!(first.is_some());
        assert!(ctl.borrow_mut().begin_sample().is_none());
        // a tick while the first is outstanding issues nothing
        block_on(CameraController::sample_tick(&ctl, &port, &backend));
        assert_eq!(backend.count("analyze_image"), 0);

        ctl.borrow_mut().finish_sample(first.unwrap(), Ok(vec![]));
        block_on(CameraController::sample_tick(&ctl, &port, &backend));
        assert_eq!(backend.count("analyze_image"), 1);
    }

    #[test]
    fn test_sample_tick_renders_results() {
        let port = MockCamera::ready();
        let (ctl, _) = started(&port);
        let backend = MockBackend::default();
        block_on(CameraController::sample_tick(&ctl, &port, &backend));

        let c = ctl.borrow();
        assert_eq!(c.results()[0].label, "joy");
        assert!(c.realtime_indicator());
        assert!(!c.is_analyzing());
    }

    #[test]
    fn test_sample_failure_is_dropped_silently() {
        let port = MockCamera::ready();
        let (ctl, bus) = started(&port);
        let backend = MockBackend::failing(CompanionError::Network("offline".to_string()));
        block_on(CameraController::sample_tick(&ctl, &port, &backend));
        assert!(!ctl.borrow().is_analyzing());
        assert!(ctl.borrow().results().is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_unready_frame_releases_guard() {
        let port = MockCamera { frame: None, ..MockCamera::ready() };
        let (ctl, _) = started(&port);
        let backend = MockBackend::default();
        block_on(CameraController::sample_tick(&ctl, &port, &backend));
        assert_eq!(backend.count("analyze_image"), 0);
        assert!(!ctl.borrow().is_analyzing());
    }

    #[test]
    fn test_result_after_stop_is_dropped() {
        let port = MockCamera::ready();
        let (ctl, _) = started(&port);
        let mut c = ctl.borrow_mut();
        let ticket = c.begin_sample().unwrap();
        assert!(c.stop(&port));

        assert!(!c.finish_sample(ticket, Ok(vec![EmotionResult::new("fear", 0.7)])));
        assert!(c.results().is_empty());
        assert!(!c.is_analyzing());
        assert_eq!(c.state(), CameraState::Idle);
    }

    #[test]
    fn test_stop_releases_tracks() {
        let port = MockCamera::ready();
        let (ctl, bus) = started(&port);
        assert!(ctl.borrow_mut().stop(&port));
        assert_eq!(port.releases.get(), 1);
        assert!(!port.is_open());
        assert!(!ctl.borrow().realtime_indicator());
        assert_eq!(messages(&bus), vec!["Camera stopped"]);

        // already idle
        assert!(!ctl.borrow_mut().stop(&port));
        assert_eq!(port.releases.get(), 1);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_capture_requires_active_camera() {
        let (ctl, bus) = camera();
        let backend = MockBackend::default();
        block_on(CameraController::capture(&ctl, &MockCamera::ready(), &backend));
        assert_eq!(backend.total_calls(), 0);
        assert_eq!(messages(&bus), vec!["Please start the camera first"]);
    }

    #[test]
    fn test_capture_success_and_failure() {
        let port = MockCamera::ready();
        let (ctl, bus) = started(&port);
        block_on(CameraController::capture(&ctl, &port, &MockBackend::default()));
        assert_eq!(ctl.borrow().results().len(), 1);
        assert_eq!(messages(&bus), vec!["Emotion detected successfully"]);

        let failing = MockBackend::failing(CompanionError::Backend { status: 500, message: None });
        block_on(CameraController::capture(&ctl, &port, &failing));
        assert_eq!(messages(&bus), vec!["Failed to analyze emotion"]);
        assert!(!ctl.borrow().is_analyzing());
    }

    fn spawn_start(pool: &LocalPool, ctl: &Rc<RefCell<CameraController>>, port: &Rc<GatedCamera>) {
        let (ctl, port) = (ctl.clone(), port.clone());
        pool.spawner()
            .spawn_local(async move {
                CameraController::start(&ctl, port.as_ref()).await;
            })
            .unwrap();
    }

    #[test]
    fn test_stop_while_opening_releases_late_grant() {
        let mut pool = LocalPool::new();
        let bus = EventBus::new();
        let ctl = Rc::new(RefCell::new(CameraController::new(CameraConfig::default(), bus.clone())));
        let port = Rc::new(GatedCamera::default());

        spawn_start(&pool, &ctl, &port);
        pool.run_until_stalled();
        assert!(ctl.borrow().is_opening());

        assert!(ctl.borrow_mut().stop(port.as_ref()));
        assert!(!ctl.borrow().is_opening());
        bus.drain();

        port.grant(0);
        pool.run_until_stalled();
        assert_eq!(ctl.borrow().state(), CameraState::Idle);
        assert!(!port.is_open());
        assert_eq!(*port.stopped.borrow(), vec![StreamHandle(1)]);
        assert!(port.leaked().is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_restart_survives_late_grant_from_cancelled_start() {
        let mut pool = LocalPool::new();
        let bus = EventBus::new();
        let ctl = Rc::new(RefCell::new(CameraController::new(CameraConfig::default(), bus.clone())));
        let port = Rc::new(GatedCamera::default());

        spawn_start(&pool, &ctl, &port);
        pool.run_until_stalled();
        ctl.borrow_mut().stop(port.as_ref());
        spawn_start(&pool, &ctl, &port);
        pool.run_until_stalled();
        bus.drain();

        port.grant(1);
        pool.run_until_stalled();
        assert_eq!(ctl.borrow().state(), CameraState::Active);
        assert!(!ctl.borrow().is_opening());
        assert_eq!(port.bound.get(), Some(StreamHandle(2)));
        assert_eq!(messages(&bus), vec!["Camera started successfully"]);

        // the cancelled prompt resolves last and must not touch stream 2
        port.grant(0);
        pool.run_until_stalled();
        assert_eq!(ctl.borrow().state(), CameraState::Active);
        assert_eq!(port.bound.get(), Some(StreamHandle(2)));
        assert_eq!(*port.stopped.borrow(), vec![StreamHandle(1)]);
        assert!(port.leaked().is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_cancelled_grant_first_keeps_newer_start_opening() {
        let mut pool = LocalPool::new();
        let bus = EventBus::new();
        let ctl = Rc::new(RefCell::new(CameraController::new(CameraConfig::default(), bus.clone())));
        let port = Rc::new(GatedCamera::default());

        spawn_start(&pool, &ctl, &port);
        pool.run_until_stalled();
        ctl.borrow_mut().stop(port.as_ref());
        spawn_start(&pool, &ctl, &port);
        pool.run_until_stalled();

        port.grant(0);
        pool.run_until_stalled();
        assert!(ctl.borrow().is_opening());
        assert_eq!(ctl.borrow().state(), CameraState::Idle);
        assert_eq!(*port.stopped.borrow(), vec![StreamHandle(1)]);

        port.grant(1);
        pool.run_until_stalled();
        assert!(!ctl.borrow().is_opening());
        assert_eq!(ctl.borrow().state(), CameraState::Active);
        assert_eq!(port.bound.get(), Some(StreamHandle(2)));
        assert!(port.leaked().is_empty());
    }

    // ─── Practice ────────────────────────────────────────────

    fn register() -> (RefCell<PracticeRegister>, EventBus) {
        let bus = EventBus::new();
        (RefCell::new(PracticeRegister::new(bus.clone())), bus)
    }

    #[test]
    fn test_countdown_completes_after_exact_ticks() {
        let (reg, bus) = register();
        let generation = reg.borrow_mut().start_mindfulness(2, "Notice your breath").unwrap();

        let mut completions = 0;
        let mut ticks = 0;
        loop {
            ticks += 1;
            match reg.borrow_mut().tick(generation) {
                TickOutcome::Running { remaining } => assert_eq!(remaining, 120 - ticks),
                TickOutcome::Completed(done) => {
                    assert_eq!(done.kind, PracticeKind::Mindfulness);
                    completions += 1;
                    break;
                }
                TickOutcome::Ignored => panic!("ignored tick {}", ticks),
            }
        }
        assert_eq!(ticks, 120);
        assert_eq!(reg.borrow_mut().tick(generation), TickOutcome::Ignored);
        assert_eq!(completions, 1);
        assert!(!reg.borrow().is_running());
        assert_eq!(messages(&bus), vec!["Mindfulness practice completed! Great job!"]);
    }

    #[test]
    fn test_clock_display() {
        let (reg, _) = register();
        let generation = reg.borrow_mut().start_mindfulness(1, "p").unwrap();
        assert_eq!(reg.borrow().active().unwrap().clock(), "01:00");
        reg.borrow_mut().tick(generation);
        assert_eq!(reg.borrow().active().unwrap().clock(), "00:59");
    }

    #[test]
    fn test_meditation_completion_reported_once() {
        let (reg, bus) = register();
        let backend = MockBackend::default();
        let generation = block_on(PracticeRegister::start_meditation(&reg, &backend, 1)).unwrap();
        assert_eq!(backend.count("start_meditation"), 1);
        assert_eq!(
            reg.borrow().active().unwrap().backend_session_id.as_deref(),
            Some("M1")
        );

        let mut running = 0;
        while block_on(PracticeRegister::on_tick(&reg, &backend, generation)) {
            running += 1;
        }
        assert_eq!(running, 59);
        assert!(!block_on(PracticeRegister::on_tick(&reg, &backend, generation)));
        assert_eq!(backend.count("complete_meditation"), 1);
        assert_eq!(messages(&bus), vec!["Meditation session completed! Well done!"]);
    }

    #[test]
    fn test_stop_never_reports_completion() {
        let (reg, bus) = register();
        let backend = MockBackend::default();
        let generation = block_on(PracticeRegister::start_meditation(&reg, &backend, 1)).unwrap();
        for _ in 0..10 {
            block_on(PracticeRegister::on_tick(&reg, &backend, generation));
        }
        assert!(reg.borrow_mut().stop());
        assert!(!block_on(PracticeRegister::on_tick(&reg, &backend, generation)));
        assert_eq!(backend.count("complete_meditation"), 0);
        assert_eq!(messages(&bus), vec!["Meditation session stopped"]);
    }

    #[test]
    fn test_second_session_cancels_first() {
        let (reg, _) = register();
        let first = reg.borrow_mut().start_mindfulness(1, "a").unwrap();
        let second = reg.borrow_mut().start_mindfulness(3, "b").unwrap();
        assert_ne!(first, second);

        assert_eq!(reg.borrow_mut().tick(first), TickOutcome::Ignored);
        assert_eq!(reg.borrow_mut().tick(second), TickOutcome::Running { remaining: 179 });
        assert_eq!(reg.borrow().active().unwrap().instructions, "b");
    }

    #[test]
    fn test_meditation_start_failure_starts_nothing() {
        let (reg, bus) = register();
        let backend = MockBackend::failing(CompanionError::Backend { status: 500, message: None });
        assert!(block_on(PracticeRegister::start_meditation(&reg, &backend, 5)).is_none());
        assert!(!reg.borrow().is_running());
        assert!(!reg.borrow().is_starting());
        assert_eq!(messages(&bus), vec!["Failed to start meditation session"]);
    }

    #[test]
    fn test_stop_while_meditation_start_pending() {
        let mut pool = LocalPool::new();
        let bus = EventBus::new();
        let reg = Rc::new(RefCell::new(PracticeRegister::new(bus.clone())));
        let (answer, gate) = oneshot::channel();
        let backend = Rc::new(MockBackend {
            meditation_gate: RefCell::new(Some(gate)),
            ..Default::default()
        });
        let started = Rc::new(Cell::new(None));

        {
            let (reg, backend, started) = (reg.clone(), backend.clone(), started.clone());
            pool.spawner()
                .spawn_local(async move {
                    let generation =
                        PracticeRegister::start_meditation(&reg, backend.as_ref(), 1).await;
                    started.set(Some(generation));
                })
                .unwrap();
        }
        pool.run_until_stalled();
        assert!(reg.borrow().is_starting());

        assert!(!reg.borrow_mut().stop());
        assert!(!reg.borrow().is_starting());

        answer.send(()).unwrap();
        pool.run_until_stalled();
        assert_eq!(started.get(), Some(None));
        assert!(!reg.borrow().is_running());
        assert!(reg.borrow().active().is_none());
        assert_eq!(backend.count("start_meditation"), 1);

        // the id the backend handed out never gets a countdown
        for generation in 0..4 {
            assert!(!block_on(PracticeRegister::on_tick(&reg, backend.as_ref(), generation)));
        }
        assert_eq!(backend.count("complete_meditation"), 0);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_zero_minutes_rejected() {
        let (reg, bus) = register();
        let backend = MockBackend::default();
        assert!(block_on(PracticeRegister::start_meditation(&reg, &backend, 0)).is_none());
        assert!(reg.borrow_mut().start_mindfulness(0, "p").is_none());
        assert_eq!(backend.total_calls(), 0);
        assert_eq!(notifications(&bus).len(), 2);
    }

    // ─── Modals ──────────────────────────────────────────────

    fn modals() -> (RefCell<ModalManager>, EventBus) {
        let bus = EventBus::new();
        (RefCell::new(ModalManager::new(TimingConfig::default(), bus.clone())), bus)
    }

    #[test]
    fn test_recommendations_include_meditation_genre() {
        let titles: Vec<&str> = recommend("calm").iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Calm Waters", "Peaceful Mind"]);
        let titles: Vec<&str> = recommend("unknown").iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Peaceful Mind"]);
    }

    #[test]
    fn test_play_schedules_finish_toast() {
        let (m, bus) = modals();
        m.borrow().play("Calm Waters");
        assert_eq!(
            bus.drain(),
            vec![
                CompanionEvent::Notify(Notification::info("Now playing: Calm Waters")),
                CompanionEvent::NotifyLater {
                    notification: Notification::info("Music finished playing"),
                    delay_ms: 5000,
                },
            ]
        );
    }

    #[test]
    fn test_only_one_modal_open() {
        let (m, _) = modals();
        let mut m = m.borrow_mut();
        m.open(ModalKind::Music);
        m.open(ModalKind::Wellness);
        assert_eq!(m.current(), Some(ModalKind::Wellness));
        m.practice_started(ModalKind::Mindfulness);
        assert!(m.is_open(ModalKind::Wellness));
        m.practice_started(ModalKind::Wellness);
        assert!(m.current().is_none());
    }

    #[test]
    fn test_save_mood_entry_appends_and_resets() {
        let (m, bus) = modals();
        let storage = Rc::new(MockStorage::default());
        let journal = MoodJournal::new(storage.clone());
        {
            let mut m = m.borrow_mut();
            m.open(ModalKind::MoodJournal);
            m.mood_form.mood = 8;
            m.mood_form.stress = 2;
            m.mood_form.notes = "good day".to_string();
        }
        block_on(ModalManager::save_mood_entry(&m, &journal));
        block_on(ModalManager::save_mood_entry(&m, &journal));

        let entries = block_on(journal.entries()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!((entries[0].mood, entries[0].energy, entries[0].stress), (8, 5, 2));
        assert_eq!(entries[0].notes, "good day");
        assert_eq!((entries[1].mood, entries[1].notes.as_str()), (5, ""));
        assert!(storage.data.borrow().contains_key(MOOD_ENTRIES_KEY));

        assert!(m.borrow().current().is_none());
        assert_eq!(m.borrow().mood_form.mood, 5);
        assert_eq!(messages(&bus), vec!["Mood entry saved successfully!"; 2]);
    }

    #[test]
    fn test_save_mood_entry_failure() {
        let (m, bus) = modals();
        let journal = MoodJournal::new(Rc::new(MockStorage { read_only: true, ..Default::default() }));
        m.borrow_mut().open(ModalKind::MoodJournal);
        m.borrow_mut().mood_form.mood = 9;
        block_on(ModalManager::save_mood_entry(&m, &journal));

        assert!(m.borrow().is_open(ModalKind::MoodJournal));
        assert_eq!(m.borrow().mood_form.mood, 9);
        assert_eq!(messages(&bus), vec!["Failed to save mood entry"]);
    }

    #[test]
    fn test_reminders_fallback_and_complete() {
        let (m, bus) = modals();
        let failing = MockBackend::failing(CompanionError::Network("offline".to_string()));
        block_on(ModalManager::load_reminders(&m, &failing));
        assert_eq!(m.borrow().reminders(), &Reminder::fallback()[..]);

        m.borrow_mut().complete_reminder(1);
        assert_eq!(m.borrow().reminders().len(), 2);
        assert_eq!(messages(&bus), vec!["Great job completing your movement reminder!"]);

        m.borrow_mut().complete_reminder(7);
        assert_eq!(m.borrow().reminders().len(), 2);
    }

    #[test]
    fn test_mindfulness_prompt_loading() {
        let (m, bus) = modals();
        let default = m.borrow().mindfulness_prompt().to_string();
        block_on(ModalManager::load_mindfulness_prompt(
            &m,
            &MockBackend::failing(CompanionError::Network("offline".to_string())),
        ));
        assert_eq!(m.borrow().mindfulness_prompt(), default);
        assert!(bus.drain().is_empty());

        block_on(ModalManager::load_mindfulness_prompt(&m, &MockBackend::default()));
        assert_eq!(m.borrow().mindfulness_prompt(), "Breathe in");
    }

    // ─── Dashboard ───────────────────────────────────────────

    fn dashboard() -> (RefCell<Dashboard>, EventBus) {
        let bus = EventBus::new();
        let chat = Rc::new(RefCell::new(ChatController::new(bus.clone())));
        let camera = Rc::new(RefCell::new(CameraController::new(CameraConfig::default(), bus.clone())));
        (RefCell::new(Dashboard::new(chat, camera, bus.clone())), bus)
    }

    #[test]
    fn test_leaving_camera_section_stops_camera() {
        let (dash, _) = dashboard();
        let port = MockCamera::ready();
        let camera = dash.borrow().camera().clone();

        assert!(!dash.borrow_mut().switch_section(Section::Camera, &port));
        assert!(block_on(CameraController::start(&camera, &port)));

        assert!(dash.borrow_mut().switch_section(Section::Wellness, &port));
        assert_eq!(camera.borrow().state(), CameraState::Idle);
        assert_eq!(port.releases.get(), 1);
        assert_eq!(dash.borrow().section(), Section::Wellness);
    }

    #[test]
    fn test_switch_between_other_sections_leaves_camera_alone() {
        let (dash, _) = dashboard();
        let port = MockCamera::ready();
        assert!(!dash.borrow_mut().switch_section(Section::Wellness, &port));
        assert!(!dash.borrow_mut().switch_section(Section::Chat, &port));
        assert_eq!(port.releases.get(), 0);
    }

    #[test]
    fn test_startup_loads_profile_and_sessions() {
        let (dash, _) = dashboard();
        let backend = MockBackend {
            sessions: vec![session("a"), session("b")],
            ..Default::default()
        };
        block_on(Dashboard::load_startup(&dash, &backend));
        let d = dash.borrow();
        assert_eq!(d.display_name(), "ada lovelace");
        assert_eq!(d.initials(), "AL");
        assert_eq!(d.chat().borrow().sessions().len(), 2);
    }

    #[test]
    fn test_startup_failures_are_silent() {
        let (dash, bus) = dashboard();
        let backend = MockBackend::failing(CompanionError::Network("offline".to_string()));
        block_on(Dashboard::load_startup(&dash, &backend));
        assert_eq!(dash.borrow().display_name(), "User");
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn test_chrome_toggles_and_logout() {
        let (dash, bus) = dashboard();
        let mut d = dash.borrow_mut();
        d.toggle_sidebar();
        assert!(d.is_sidebar_open());
        d.switch_section(Section::Chat, &MockCamera::ready());
        assert!(!d.is_sidebar_open());
        d.toggle_dropdown();
        d.logout();
        assert!(!d.is_dropdown_open());
        assert_eq!(
            bus.drain(),
            vec![CompanionEvent::Redirect { path: "/logout".to_string(), delay_ms: 0 }]
        );
    }
}
