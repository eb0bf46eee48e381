//! Login / registration page.

use egui::{self, Align, Layout, RichText, Vec2};
use companion_core::auth::AuthController;
use companion_types::auth::{AuthMode, OAuthProvider};
use crate::theme::*;

/// What the caller should do after rendering the auth page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    None,
    Submit,
    GuestLogin,
    OAuth(OAuthProvider),
    /// Switch between the login and registration pages
    Navigate(&'static str),
}

pub fn auth_panel(ui: &mut egui::Ui, auth: &mut AuthController) -> AuthAction {
    let mut action = AuthAction::None;
    let mode = auth.mode();
    let (title, subtitle) = match mode {
        AuthMode::Login => ("Welcome Back", "Sign in to continue your wellness journey"),
        AuthMode::Register => ("Create Account", "Start your wellness journey today"),
    };

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(24.0)
            .show(ui, |ui| {
                ui.set_max_width(360.0);
                ui.heading(RichText::new(title).color(TEXT_PRIMARY).strong());
                ui.label(RichText::new(subtitle).color(TEXT_SECONDARY));
                ui.add_space(12.0);

                // Inline alerts
                let mut dismissed = None;
                for (i, alert) in auth.alerts().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(&alert.message).color(level_color(alert.level)));
                        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                            if ui.small_button("×").clicked() {
                                dismissed = Some(i);
                            }
                        });
                    });
                }
                if let Some(i) = dismissed {
                    auth.dismiss_alert(i);
                }

                let mut enter = false;

                ui.label(RichText::new("Username").color(TEXT_SECONDARY).small());
                let r = ui.add(
                    egui::TextEdit::singleline(&mut auth.username)
                        .hint_text("Enter your username")
                        .desired_width(f32::INFINITY),
                );
                enter |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

                if mode == AuthMode::Register {
                    ui.label(RichText::new("Email").color(TEXT_SECONDARY).small());
                    let r = ui.add(
                        egui::TextEdit::singleline(&mut auth.email)
                            .hint_text("you@example.com")
                            .desired_width(f32::INFINITY),
                    );
                    enter |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                }

                ui.label(RichText::new("Password").color(TEXT_SECONDARY).small());
                ui.horizontal(|ui| {
                    let r = ui.add(
                        egui::TextEdit::singleline(&mut auth.password)
                            .password(!auth.show_password)
                            .hint_text("Enter your password")
                            .desired_width(ui.available_width() - 36.0),
                    );
                    enter |= r.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    let eye = if auth.show_password { "🙈" } else { "👁" };
                    if ui.button(eye).clicked() {
                        auth.show_password = !auth.show_password;
                    }
                });

                if let Some((score, strength)) = auth.password_strength() {
                    if !auth.password.is_empty() {
                        ui.add(
                            egui::ProgressBar::new(score as f32 / 5.0)
                                .desired_width(f32::INFINITY)
                                .fill(strength_color(score)),
                        );
                        ui.label(
                            RichText::new(format!("Password strength: {}", strength.label()))
                                .color(strength_color(score))
                                .small(),
                        );
                    }
                }

                ui.add_space(8.0);
                let label = match (mode, auth.is_submitting()) {
                    (AuthMode::Login, false) => "Sign In",
                    (AuthMode::Login, true) => "Signing in...",
                    (AuthMode::Register, false) => "Create Account",
                    (AuthMode::Register, true) => "Creating account...",
                };
                let submit = ui.add_enabled(
                    !auth.is_submitting(),
                    egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(ui.available_width(), 32.0)),
                );
                if submit.clicked() || (enter && !auth.is_submitting()) {
                    action = AuthAction::Submit;
                }

                ui.add_space(8.0);
                ui.separator();
                ui.label(RichText::new("or continue with").color(TEXT_SECONDARY).small());
                ui.horizontal(|ui| {
                    for provider in OAuthProvider::all() {
                        if ui.button(provider.label()).clicked() {
                            action = AuthAction::OAuth(*provider);
                        }
                    }
                });
                let guest_label = if auth.is_guest_pending() {
                    "Creating guest session..."
                } else {
                    "Continue as Guest"
                };
                if ui
                    .add_enabled(!auth.is_guest_pending(), egui::Button::new(guest_label))
                    .clicked()
                {
                    action = AuthAction::GuestLogin;
                }

                ui.add_space(8.0);
                let (prompt, link, target) = match mode {
                    AuthMode::Login => ("Don't have an account?", "Sign up", "/register"),
                    AuthMode::Register => ("Already have an account?", "Sign in", "/login"),
                };
                ui.horizontal(|ui| {
                    ui.label(RichText::new(prompt).color(TEXT_SECONDARY).small());
                    if ui.link(link).clicked() {
                        action = AuthAction::Navigate(target);
                    }
                });
            });
    });

    action
}
