//! Login / registration form logic.
//!
//! Validation runs before any request is issued. While a submission is in
//! flight further submits are refused, which is the only de-duplication
//! the forms get.

use std::cell::RefCell;
use std::sync::OnceLock;

use regex::Regex;
use companion_types::{
    CompanionError, Result,
    auth::{AuthMode, LoginRequest, OAuthProvider, RegisterRequest},
    config::TimingConfig,
    event::{CompanionEvent, Notification},
};
use crate::event_bus::EventBus;
use crate::ports::BackendPort;

pub const MIN_PASSWORD_LEN: usize = 6;

// ─── Validation ──────────────────────────────────────────────

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

pub fn validate_login(username: &str, password: &str) -> Result<LoginRequest> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(CompanionError::Validation("Please fill in all fields".to_string()));
    }
    Ok(LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_register(username: &str, email: &str, password: &str) -> Result<RegisterRequest> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(CompanionError::Validation("Please fill in all fields".to_string()));
    }
    if !is_valid_email(email) {
        return Err(CompanionError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CompanionError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

// ─── Password strength ───────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => PasswordStrength::VeryWeak,
            2 => PasswordStrength::Weak,
            3 => PasswordStrength::Fair,
            4 => PasswordStrength::Good,
            _ => PasswordStrength::Strong,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::VeryWeak => "Very Weak",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Fair => "Fair",
            PasswordStrength::Good => "Good",
            PasswordStrength::Strong => "Strong",
        }
    }
}

/// One point per satisfied criterion: length ≥ 8, lowercase, uppercase,
/// digit, symbol. Always within `0..=5`.
pub fn score_password(password: &str) -> u8 {
    let criteria = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    criteria.iter().filter(|met| **met).count() as u8
}

// ─── Controller ──────────────────────────────────────────────

/// A validated form, ready to post
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Login(LoginRequest),
    Register(RegisterRequest),
}

pub struct AuthController {
    mode: AuthMode,
    pub username: String,
    pub email: String,
    pub password: String,
    pub show_password: bool,
    submitting: bool,
    guest_pending: bool,
    /// Inline alerts rendered above the form
    alerts: Vec<Notification>,
    timing: TimingConfig,
    events: EventBus,
}

impl AuthController {
    pub fn new(mode: AuthMode, timing: TimingConfig, events: EventBus) -> Self {
        Self {
            mode,
            username: String::new(),
            email: String::new(),
            password: String::new(),
            show_password: false,
            submitting: false,
            guest_pending: false,
            alerts: Vec::new(),
            timing,
            events,
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_guest_pending(&self) -> bool {
        self.guest_pending
    }

    pub fn alerts(&self) -> &[Notification] {
        &self.alerts
    }

    pub fn dismiss_alert(&mut self, index: usize) {
        if index < self.alerts.len() {
            self.alerts.remove(index);
        }
    }

    /// Live strength meter; only the registration page shows one.
    pub fn password_strength(&self) -> Option<(u8, PasswordStrength)> {
        match self.mode {
            AuthMode::Register => {
                let score = score_password(&self.password);
                Some((score, PasswordStrength::from_score(score)))
            }
            AuthMode::Login => None,
        }
    }

    /// Validate and lock the form. `None` if a submission is already in
    /// flight or validation failed (the failure is shown inline).
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.submitting {
            return None;
        }
        let validated = match self.mode {
            AuthMode::Login => validate_login(&self.username, &self.password).map(Submission::Login),
            AuthMode::Register => {
                validate_register(&self.username, &self.email, &self.password).map(Submission::Register)
            }
        };
        match validated {
            Ok(submission) => {
                self.alerts.clear();
                self.submitting = true;
                Some(submission)
            }
            Err(e) => {
                self.alerts = vec![Notification::error(e.to_string())];
                None
            }
        }
    }

    pub fn finish_submit(&mut self, submission: &Submission, result: Result<()>) {
        self.submitting = false;
        let (success, fallback, path, delay_ms) = match submission {
            Submission::Login(_) => (
                "Login successful! Redirecting...",
                "Login failed",
                "/",
                self.timing.login_redirect_ms,
            ),
            Submission::Register(_) => (
                "Account created successfully! Redirecting to login...",
                "Registration failed",
                "/login",
                self.timing.register_redirect_ms,
            ),
        };

        match result {
            Ok(()) => {
                self.alerts.push(Notification::success(success));
                self.events.emit(CompanionEvent::Redirect {
                    path: path.to_string(),
                    delay_ms,
                });
            }
            Err(e) => {
                log::error!("{} error: {}", fallback, e);
                self.alerts.push(Notification::error(e.user_message(fallback)));
            }
        }
    }

    pub async fn submit(this: &RefCell<Self>, backend: &dyn BackendPort) {
        let Some(submission) = this.borrow_mut().begin_submit() else {
            return;
        };
        let result = match &submission {
            Submission::Login(req) => backend.login(req).await,
            Submission::Register(req) => backend.register(req).await,
        };
        this.borrow_mut().finish_submit(&submission, result);
    }

    pub async fn guest_login(this: &RefCell<Self>, backend: &dyn BackendPort) {
        {
            let mut auth = this.borrow_mut();
            if auth.guest_pending {
                return;
            }
            auth.guest_pending = true;
        }

        let result = backend.guest_login().await;

        let mut auth = this.borrow_mut();
        auth.guest_pending = false;
        match result {
            Ok(()) => {
                auth.events.notify(Notification::success("Guest session created successfully!"));
                auth.events.emit(CompanionEvent::Redirect {
                    path: "/".to_string(),
                    delay_ms: auth.timing.login_redirect_ms,
                });
            }
            Err(e) => {
                log::error!("Guest login error: {}", e);
                let message = match &e {
                    CompanionError::Backend { .. } => e.user_message("Failed to create guest session"),
                    _ => "Failed to create guest session. Please try again.".to_string(),
                };
                auth.events.notify(Notification::error(message));
            }
        }
    }

    /// Hand off to the provider's OAuth flow (a full-page navigation).
    pub fn oauth(&self, backend: &dyn BackendPort, provider: OAuthProvider) {
        self.events.notify(Notification::info(format!(
            "Redirecting to {}...",
            provider.label()
        )));
        self.events.emit(CompanionEvent::Redirect {
            path: backend.oauth_url(provider),
            delay_ms: 0,
        });
    }
}
