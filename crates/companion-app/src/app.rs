//! Main egui application: composes all panels and owns the controllers.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use egui::{self, CentralPanel, ScrollArea, SidePanel, TopBottomPanel};

use companion_core::auth::AuthController;
use companion_core::camera::CameraController;
use companion_core::chat::ChatController;
use companion_core::dashboard::{Dashboard, Section};
use companion_core::event_bus::EventBus;
use companion_core::modals::{ModalKind, ModalManager, MoodJournal};
use companion_core::ports::{BackendPort, CameraPort, StoragePort, StreamHandle};
use companion_core::practice::PracticeRegister;
use companion_platform::camera::BrowserCamera;
use companion_platform::http::HttpBackend;
use companion_platform::navigation;
use companion_platform::timers::{Delay, Ticker};
use companion_types::auth::AuthMode;
use companion_types::config::CompanionConfig;
use companion_types::event::CompanionEvent;
use companion_types::{CompanionError, Result};
use companion_ui::panels::auth::{self as auth_page, AuthAction};
use companion_ui::panels::camera::{self as camera_panel, CameraAction};
use companion_ui::panels::chat::{self, ChatAction};
use companion_ui::panels::modals::{self as modal_panel, ModalAction};
use companion_ui::panels::nav::{self, NavAction};
use companion_ui::panels::{practice as practice_panel, toasts, wellness};
use companion_ui::state::UiState;
use companion_ui::theme;

/// Below this width the sidebar only shows when toggled open
const SIDEBAR_BREAKPOINT: f32 = 768.0;
/// Seconds between camera preview uploads
const PREVIEW_PERIOD: f64 = 0.1;

/// Sampling interval of the running camera session
type SamplerSlot = Rc<RefCell<Option<Ticker>>>;
/// Countdown ticker, tagged with the practice generation it drives
type PracticeSlot = Rc<RefCell<Option<(u64, Ticker)>>>;

enum Page {
    Auth(Rc<RefCell<AuthController>>),
    Dashboard,
}

/// The main application state
pub struct CompanionApp {
    ui_state: UiState,
    config: CompanionConfig,
    events: EventBus,
    backend: Rc<dyn BackendPort>,
    camera_port: Rc<dyn CameraPort>,
    journal: MoodJournal,
    page: Page,
    dashboard: Rc<RefCell<Dashboard>>,
    chat: Rc<RefCell<ChatController>>,
    camera: Rc<RefCell<CameraController>>,
    modals: Rc<RefCell<ModalManager>>,
    practice: Rc<RefCell<PracticeRegister>>,
    sampler: SamplerSlot,
    practice_ticker: PracticeSlot,
    preview: Option<egui::TextureHandle>,
    last_preview: f64,
    first_frame: bool,
}

impl CompanionApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: CompanionConfig,
        storage: Rc<dyn StoragePort>,
    ) -> Self {
        let events = EventBus::new();
        let backend: Rc<dyn BackendPort> = Rc::new(HttpBackend::new(config.backend.clone()));

        let camera_port: Rc<dyn CameraPort> = match BrowserCamera::new() {
            Ok(c) => Rc::new(c),
            Err(e) => {
                log::warn!("Camera adapter unavailable: {}. Using stub.", e);
                Rc::new(UnavailableCamera)
            }
        };

        let chat = Rc::new(RefCell::new(ChatController::new(events.clone())));
        let camera = Rc::new(RefCell::new(CameraController::new(
            config.camera.clone(),
            events.clone(),
        )));
        let dashboard = Rc::new(RefCell::new(Dashboard::new(
            chat.clone(),
            camera.clone(),
            events.clone(),
        )));
        let modals = Rc::new(RefCell::new(ModalManager::new(
            config.timing.clone(),
            events.clone(),
        )));
        let practice = Rc::new(RefCell::new(PracticeRegister::new(events.clone())));

        let page = match navigation::current_path().as_str() {
            "/login" => Page::Auth(Rc::new(RefCell::new(AuthController::new(
                AuthMode::Login,
                config.timing.clone(),
                events.clone(),
            )))),
            "/register" => Page::Auth(Rc::new(RefCell::new(AuthController::new(
                AuthMode::Register,
                config.timing.clone(),
                events.clone(),
            )))),
            _ => Page::Dashboard,
        };

        let app = Self {
            ui_state: UiState::new(config.timing.notification_ms),
            config,
            events,
            backend,
            camera_port,
            journal: MoodJournal::new(storage),
            page,
            dashboard,
            chat,
            camera,
            modals,
            practice,
            sampler: Rc::new(RefCell::new(None)),
            practice_ticker: Rc::new(RefCell::new(None)),
            preview: None,
            last_preview: f64::NEG_INFINITY,
            first_frame: true,
        };

        if matches!(app.page, Page::Dashboard) {
            app.load_dashboard(&cc.egui_ctx);
        }
        app
    }

    /// Profile, session list, reminders and the mindfulness prompt.
    fn load_dashboard(&self, ctx: &egui::Context) {
        let dashboard = self.dashboard.clone();
        let modals = self.modals.clone();
        let backend = self.backend.clone();
        spawn(ctx, async move {
            Dashboard::load_startup(&dashboard, backend.as_ref()).await;
            ModalManager::load_reminders(&modals, backend.as_ref()).await;
            ModalManager::load_mindfulness_prompt(&modals, backend.as_ref()).await;
            log::info!("Dashboard data loaded");
        });
    }
}

impl eframe::App for CompanionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        let now = ctx.input(|i| i.time);

        // Drain events from the controllers
        let events = self.events.drain();
        if !events.is_empty() {
            let deferred = self.ui_state.process_events(events, now);
            for event in deferred {
                self.schedule(event, ctx);
            }
            ctx.request_repaint();
        }

        match &self.page {
            Page::Auth(auth) => {
                let auth = auth.clone();
                self.show_auth(ctx, &auth);
            }
            Page::Dashboard => self.show_dashboard(ctx),
        }

        if let Some(id) = toasts::toasts(ctx, &self.ui_state) {
            self.ui_state.dismiss(id);
        }
        if self.ui_state.prune(now) {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}

impl CompanionApp {
    /// Upload the latest camera frame into the preview texture.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if now - self.last_preview < PREVIEW_PERIOD {
            return;
        }
        self.last_preview = now;

        let frame = match self.camera_port.preview_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                log::debug!("No camera preview: {}", e);
                return;
            }
        };
        let Some(image) = camera_panel::preview_image(&frame) else {
            return;
        };
        match &mut self.preview {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.preview =
                    Some(ctx.load_texture("camera_preview", image, egui::TextureOptions::LINEAR));
            }
        }
    }

    // ─── Pages ───────────────────────────────────────────────

    fn show_auth(&mut self, ctx: &egui::Context, auth: &Rc<RefCell<AuthController>>) {
        let mut action = AuthAction::None;
        CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical().show(ui, |ui| {
                action = auth_page::auth_panel(ui, &mut auth.borrow_mut());
            });
        });

        match action {
            AuthAction::None => {}
            AuthAction::Submit => {
                let auth = auth.clone();
                let backend = self.backend.clone();
                spawn(ctx, async move {
                    AuthController::submit(&auth, backend.as_ref()).await;
                });
            }
            AuthAction::GuestLogin => {
                let auth = auth.clone();
                let backend = self.backend.clone();
                spawn(ctx, async move {
                    AuthController::guest_login(&auth, backend.as_ref()).await;
                });
            }
            AuthAction::OAuth(provider) => auth.borrow().oauth(self.backend.as_ref(), provider),
            AuthAction::Navigate(path) => self.events.emit(CompanionEvent::Redirect {
                path: path.to_string(),
                delay_ms: 0,
            }),
        }
    }

    fn show_dashboard(&mut self, ctx: &egui::Context) {
        let mut nav_actions = Vec::new();

        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            nav_actions.push(nav::top_bar(ui, &self.dashboard.borrow()));
        });
        nav_actions.push(nav::user_dropdown(ctx, &self.dashboard.borrow()));

        let wide = ctx.screen_rect().width() >= SIDEBAR_BREAKPOINT;
        if wide || self.dashboard.borrow().is_sidebar_open() {
            SidePanel::left("sidebar")
                .resizable(false)
                .default_width(200.0)
                .show(ctx, |ui| {
                    nav_actions.push(nav::sidebar(ui, &self.dashboard.borrow()));
                });
        }

        let section = self.dashboard.borrow().section();
        let mut chat_action = ChatAction::None;
        let mut camera_action = CameraAction::None;
        let mut open_modal = None;

        let live = section == Section::Camera && self.camera.borrow().is_active();
        if live {
            self.refresh_preview(ctx);
        } else {
            self.preview = None;
        }

        CentralPanel::default().show(ctx, |ui| match section {
            Section::Chat => {
                chat_action = chat::chat_panel(
                    ui,
                    &self.chat.borrow(),
                    &mut self.ui_state.chat_input,
                    chrono::Utc::now(),
                );
            }
            Section::Camera => {
                camera_action =
                    camera_panel::camera_panel(ui, &self.camera.borrow(), self.preview.as_ref());
                if live {
                    ui.ctx()
                        .request_repaint_after(Duration::from_secs_f64(PREVIEW_PERIOD));
                }
            }
            Section::Wellness => {
                ScrollArea::vertical().show(ui, |ui| {
                    open_modal = wellness::wellness_panel(ui, &self.modals.borrow());
                });
            }
        });

        let dialog_action = chat::chat_dialogs(ctx, &self.chat.borrow());
        let modal_action = modal_panel::modal_window(ctx, &mut self.modals.borrow_mut());

        let stop_practice = match self.practice.borrow().active() {
            Some(session) => practice_panel::practice_overlay(ctx, session),
            None => false,
        };

        for action in nav_actions {
            self.handle_nav(action);
        }
        if let Some(kind) = open_modal {
            self.modals.borrow_mut().open(kind);
        }
        self.handle_chat(chat_action, ctx);
        self.handle_chat(dialog_action, ctx);
        self.handle_camera(camera_action, ctx);
        self.handle_modal(modal_action, ctx);
        if stop_practice {
            self.practice.borrow_mut().stop();
            self.practice_ticker.borrow_mut().take();
        }
    }

    // ─── Actions ─────────────────────────────────────────────

    fn handle_nav(&mut self, action: NavAction) {
        match action {
            NavAction::None => {}
            NavAction::Switch(section) => {
                let stopped = self
                    .dashboard
                    .borrow_mut()
                    .switch_section(section, self.camera_port.as_ref());
                if stopped {
                    self.sampler.borrow_mut().take();
                }
            }
            NavAction::OpenModal(kind) => {
                self.dashboard.borrow_mut().close_sidebar();
                self.modals.borrow_mut().open(kind);
            }
            NavAction::ToggleSidebar => self.dashboard.borrow_mut().toggle_sidebar(),
            NavAction::ToggleDropdown => self.dashboard.borrow_mut().toggle_dropdown(),
            NavAction::Logout => self.dashboard.borrow_mut().logout(),
        }
    }

    fn handle_chat(&mut self, action: ChatAction, ctx: &egui::Context) {
        let chat = self.chat.clone();
        let backend = self.backend.clone();
        match action {
            ChatAction::None => {}
            ChatAction::Send(text) => spawn(ctx, async move {
                ChatController::send_message(&chat, backend.as_ref(), &text).await;
            }),
            ChatAction::NewChat => spawn(ctx, async move {
                ChatController::start_new_chat(&chat, backend.as_ref()).await;
            }),
            ChatAction::OpenSession(id) => spawn(ctx, async move {
                ChatController::open_session(&chat, backend.as_ref(), &id).await;
            }),
            ChatAction::ConfirmDelete => spawn(ctx, async move {
                ChatController::confirm_delete(&chat, backend.as_ref()).await;
            }),
            ChatAction::RequestDelete(id) => chat.borrow_mut().request_delete(&id),
            ChatAction::CancelDelete => chat.borrow_mut().cancel_delete(),
            ChatAction::RequestClear => chat.borrow_mut().request_clear(),
            ChatAction::ConfirmClear => chat.borrow_mut().confirm_clear(),
            ChatAction::CancelClear => chat.borrow_mut().cancel_clear(),
        }
    }

    fn handle_camera(&mut self, action: CameraAction, ctx: &egui::Context) {
        match action {
            CameraAction::None => {}
            CameraAction::Start => self.start_camera(ctx),
            CameraAction::Stop => {
                self.camera.borrow_mut().stop(self.camera_port.as_ref());
                self.sampler.borrow_mut().take();
            }
            CameraAction::Capture => {
                let camera = self.camera.clone();
                let port = self.camera_port.clone();
                let backend = self.backend.clone();
                spawn(ctx, async move {
                    CameraController::capture(&camera, port.as_ref(), backend.as_ref()).await;
                });
            }
        }
    }

    /// Open the camera, then install the periodic sampler.
    fn start_camera(&self, ctx: &egui::Context) {
        let camera = self.camera.clone();
        let port = self.camera_port.clone();
        let backend = self.backend.clone();
        let sampler = self.sampler.clone();
        let repaint = ctx.clone();

        spawn(ctx, async move {
            if !CameraController::start(&camera, port.as_ref()).await {
                return;
            }
            let period_ms = camera.borrow().sample_interval_ms();
            let ticker = Ticker::start(period_ms, move || {
                let camera = camera.clone();
                let port = port.clone();
                let backend = backend.clone();
                let ctx = repaint.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    CameraController::sample_tick(&camera, port.as_ref(), backend.as_ref()).await;
                    ctx.request_repaint();
                });
            });
            *sampler.borrow_mut() = Some(ticker);
        });
    }

    fn handle_modal(&mut self, action: ModalAction, ctx: &egui::Context) {
        match action {
            ModalAction::None => {}
            ModalAction::Close => self.modals.borrow_mut().close(),
            ModalAction::SaveMood => {
                let modals = self.modals.clone();
                let journal = self.journal.clone();
                spawn(ctx, async move {
                    ModalManager::save_mood_entry(&modals, &journal).await;
                });
            }
            ModalAction::Recommend => self.modals.borrow_mut().recommend(),
            ModalAction::Play(title) => self.modals.borrow().play(title),
            ModalAction::CompleteReminder(index) => self.modals.borrow_mut().complete_reminder(index),
            ModalAction::StartMeditation => self.start_meditation(ctx),
            ModalAction::StartMindfulness => {
                let (minutes, prompt) = {
                    let modals = self.modals.borrow();
                    (modals.mindfulness_minutes, modals.mindfulness_prompt().to_string())
                };
                let started = self.practice.borrow_mut().start_mindfulness(minutes, &prompt);
                if let Some(generation) = started {
                    self.modals.borrow_mut().practice_started(ModalKind::Mindfulness);
                    install_practice_ticker(
                        &self.practice_ticker,
                        self.practice.clone(),
                        self.backend.clone(),
                        ctx.clone(),
                        self.config.timing.practice_tick_ms,
                        generation,
                    );
                }
            }
        }
    }

    fn start_meditation(&self, ctx: &egui::Context) {
        let minutes = self.modals.borrow().meditation_minutes;
        let practice = self.practice.clone();
        let modals = self.modals.clone();
        let backend = self.backend.clone();
        let slot = self.practice_ticker.clone();
        let period_ms = self.config.timing.practice_tick_ms;
        let repaint = ctx.clone();

        spawn(ctx, async move {
            let Some(generation) =
                PracticeRegister::start_meditation(&practice, backend.as_ref(), minutes).await
            else {
                return;
            };
            modals.borrow_mut().practice_started(ModalKind::Wellness);
            install_practice_ticker(&slot, practice, backend, repaint, period_ms, generation);
        });
    }

    // ─── Deferred events ─────────────────────────────────────

    /// Run a browser-side event now or after its delay.
    fn schedule(&self, event: CompanionEvent, ctx: &egui::Context) {
        match event {
            CompanionEvent::Redirect { path, delay_ms } => {
                log::info!("Redirecting to {} in {} ms", path, delay_ms);
                if delay_ms == 0 {
                    go(&path);
                } else {
                    Delay::start(delay_ms, move || go(&path)).detach();
                }
            }
            CompanionEvent::NotifyLater { notification, delay_ms } => {
                let events = self.events.clone();
                let ctx = ctx.clone();
                Delay::start(delay_ms, move || {
                    events.notify(notification);
                    ctx.request_repaint();
                })
                .detach();
            }
            other => log::debug!("Unexpected deferred event: {:?}", other),
        }
    }
}

fn go(path: &str) {
    if let Err(e) = navigation::redirect(path) {
        log::error!("Navigation to {} failed: {}", path, e);
    }
}

/// Run `fut` on the browser event loop and repaint once it settles.
fn spawn<F>(ctx: &egui::Context, fut: F)
where
    F: Future<Output = ()> + 'static,
{
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        fut.await;
        ctx.request_repaint();
    });
}

/// Drive `generation` once per period until it completes or is replaced.
/// Replaces (and so cancels) any ticker already in the slot.
fn install_practice_ticker(
    slot: &PracticeSlot,
    practice: Rc<RefCell<PracticeRegister>>,
    backend: Rc<dyn BackendPort>,
    ctx: egui::Context,
    period_ms: u32,
    generation: u64,
) {
    let own_slot = slot.clone();
    let ticker = Ticker::start(period_ms, move || {
        let practice = practice.clone();
        let backend = backend.clone();
        let slot = own_slot.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let keep = PracticeRegister::on_tick(&practice, backend.as_ref(), generation).await;
            if !keep {
                let mut slot = slot.borrow_mut();
                if slot.as_ref().is_some_and(|(g, _)| *g == generation) {
                    *slot = None;
                }
            }
            ctx.request_repaint();
        });
    });
    *slot.borrow_mut() = Some((generation, ticker));
}

// ─── Stub camera for browsers without media devices ──────────

struct UnavailableCamera;

#[async_trait(?Send)]
impl CameraPort for UnavailableCamera {
    async fn open(&self, _width: u32, _height: u32) -> Result<StreamHandle> {
        Err(CompanionError::Camera("Camera not available".to_string()))
    }

    fn bind(&self, _stream: StreamHandle) -> Result<()> {
        Err(CompanionError::Camera("Camera not available".to_string()))
    }

    fn release_stream(&self, _stream: StreamHandle) {}

    fn capture_frame(&self, _jpeg_quality: f64) -> Result<Option<String>> {
        Ok(None)
    }

    fn release(&self) {}

    fn is_open(&self) -> bool {
        false
    }
}
