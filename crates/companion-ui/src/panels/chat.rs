//! Chat panel: session history, transcript and input field.

use chrono::{DateTime, Utc};
use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use companion_core::chat::ChatController;
use companion_types::emotion::icon_for;
use companion_types::message::ChatMessage;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    None,
    Send(String),
    NewChat,
    RequestClear,
    ConfirmClear,
    CancelClear,
    OpenSession(String),
    RequestDelete(String),
    ConfirmDelete,
    CancelDelete,
}

const HISTORY_WIDTH: f32 = 220.0;

/// Render the chat section. `input` is the text box content; it is
/// cleared when a message is submitted.
pub fn chat_panel(
    ui: &mut egui::Ui,
    chat: &ChatController,
    input: &mut String,
    now: DateTime<Utc>,
) -> ChatAction {
    let mut action = ChatAction::None;
    let height = ui.available_height();

    ui.horizontal_top(|ui| {
        ui.allocate_ui_with_layout(
            Vec2::new(HISTORY_WIDTH, height),
            Layout::top_down(Align::Min),
            |ui| {
                if let Some(a) = history(ui, chat, now) {
                    action = a;
                }
            },
        );
        ui.separator();
        ui.vertical(|ui| {
            if let Some(a) = conversation(ui, chat, input) {
                action = a;
            }
        });
    });

    action
}

fn history(ui: &mut egui::Ui, chat: &ChatController, now: DateTime<Utc>) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("Conversations").strong().color(TEXT_PRIMARY));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("＋ New").clicked() {
                action = Some(ChatAction::NewChat);
            }
        });
    });
    ui.separator();

    if chat.sessions().is_empty() {
        ui.label(RichText::new("No conversations yet").color(TEXT_SECONDARY).small());
        return action;
    }

    ScrollArea::vertical()
        .id_salt("chat_history")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for session in chat.sessions() {
                let active = chat.is_active(&session.id);
                egui::Frame::default()
                    .fill(if active { ACCENT_SOFT } else { BG_SECONDARY })
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(6.0)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                if ui
                                    .link(RichText::new(session.display_title()).color(TEXT_PRIMARY))
                                    .clicked()
                                {
                                    action = Some(ChatAction::OpenSession(session.id.clone()));
                                }
                                ui.label(
                                    RichText::new(format!(
                                        "{} messages · {}",
                                        session.message_count,
                                        session.age_label(now)
                                    ))
                                    .color(TEXT_SECONDARY)
                                    .small(),
                                );
                            });
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                if ui.small_button("🗑").on_hover_text("Delete").clicked() {
                                    action = Some(ChatAction::RequestDelete(session.id.clone()));
                                }
                            });
                        });
                    });
                ui.add_space(4.0);
            }
        });

    action
}

fn conversation(ui: &mut egui::Ui, chat: &ChatController, input: &mut String) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("AI Companion").color(TEXT_PRIMARY).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui.button("Clear chat").clicked() {
                action = Some(ChatAction::RequestClear);
            }
        });
    });
    ui.separator();

    let available_height = ui.available_height() - 60.0;
    ScrollArea::vertical()
        .id_salt("chat_transcript")
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for message in chat.transcript() {
                render_message(ui, message);
                ui.add_space(4.0);
            }
            if chat.is_typing() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("AI is typing...").color(TEXT_SECONDARY).italics());
                });
            }
        });

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let edit = egui::TextEdit::singleline(input)
            .hint_text("Type your message...")
            .desired_width(ui.available_width() - 70.0)
            .font(egui::FontId::proportional(14.0));
        let response = ui.add(edit);

        let send_enabled = !input.trim().is_empty();
        let send_btn = ui.add_enabled(
            send_enabled,
            egui::Button::new(RichText::new("Send").color(egui::Color32::WHITE))
                .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(60.0, 0.0)),
        );

        let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if (enter && send_enabled) || send_btn.clicked() {
            action = Some(ChatAction::Send(input.trim().to_string()));
            input.clear();
            response.request_focus();
        }
    });

    action
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage) {
    let (layout, label, bg) = if message.is_user() {
        (Layout::right_to_left(Align::Min), "You", ACCENT_SOFT)
    } else {
        (Layout::left_to_right(Align::Min), "AI Companion", BG_SECONDARY)
    };

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(bg)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(480.0);
                ui.horizontal(|ui| {
                    ui.label(RichText::new(label).color(ACCENT).strong().small());
                    ui.label(RichText::new(message.time_label()).color(TEXT_SECONDARY).small());
                });
                ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
                if let Some(emotion) = &message.emotion {
                    ui.label(
                        RichText::new(format!("{} {}", icon_for(emotion), emotion))
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                }
            });
    });
}

/// Delete / clear confirmation dialogs.
pub fn chat_dialogs(ctx: &egui::Context, chat: &ChatController) -> ChatAction {
    if chat.pending_delete().is_some() {
        return confirm(
            ctx,
            "confirm_delete",
            "Delete this chat session? This cannot be undone.",
            "Delete",
            ChatAction::ConfirmDelete,
            ChatAction::CancelDelete,
        );
    }
    if chat.is_confirming_clear() {
        return confirm(
            ctx,
            "confirm_clear",
            "Clear the current conversation?",
            "Clear",
            ChatAction::ConfirmClear,
            ChatAction::CancelClear,
        );
    }
    ChatAction::None
}

fn confirm(
    ctx: &egui::Context,
    id: &str,
    question: &str,
    yes_label: &str,
    yes: ChatAction,
    no: ChatAction,
) -> ChatAction {
    let modal = egui::Modal::new(egui::Id::new(id)).show(ctx, |ui| {
        ui.set_width(300.0);
        ui.label(RichText::new(question).color(TEXT_PRIMARY));
        ui.add_space(8.0);
        let mut choice = None;
        ui.horizontal(|ui| {
            if ui
                .add(egui::Button::new(RichText::new(yes_label).color(egui::Color32::WHITE)).fill(ERROR))
                .clicked()
            {
                choice = Some(true);
            }
            if ui.button("Cancel").clicked() {
                choice = Some(false);
            }
        });
        choice
    });

    match modal.inner {
        Some(true) => yes,
        Some(false) => no,
        None if modal.should_close() => no,
        None => ChatAction::None,
    }
}
