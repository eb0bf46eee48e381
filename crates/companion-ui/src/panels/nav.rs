//! Dashboard chrome: top bar with the user menu, and the section sidebar.

use egui::{self, Align, Layout, RichText, Vec2};
use companion_core::dashboard::{Dashboard, Section};
use companion_core::modals::ModalKind;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    None,
    Switch(Section),
    OpenModal(ModalKind),
    ToggleSidebar,
    ToggleDropdown,
    Logout,
}

const TOOLS: [(ModalKind, &str); 4] = [
    (ModalKind::MoodJournal, "📓"),
    (ModalKind::Music, "🎵"),
    (ModalKind::Wellness, "🧘"),
    (ModalKind::Mindfulness, "🌸"),
];

pub fn top_bar(ui: &mut egui::Ui, dash: &Dashboard) -> NavAction {
    let mut action = NavAction::None;

    ui.horizontal(|ui| {
        if ui.button("☰").clicked() {
            action = NavAction::ToggleSidebar;
        }
        ui.label(RichText::new("AI Companion").strong().color(ACCENT).size(16.0));
        ui.separator();
        ui.label(RichText::new(dash.section().label()).color(TEXT_SECONDARY));

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let badge = egui::Button::new(
                RichText::new(dash.initials()).color(egui::Color32::WHITE).strong(),
            )
            .fill(ACCENT)
            .corner_radius(egui::CornerRadius::same(16))
            .min_size(Vec2::new(32.0, 32.0));
            if ui.add(badge).clicked() {
                action = NavAction::ToggleDropdown;
            }
            ui.label(RichText::new(dash.display_name()).color(TEXT_PRIMARY));
        });
    });

    action
}

/// The user dropdown, anchored under the top bar's right edge.
pub fn user_dropdown(ctx: &egui::Context, dash: &Dashboard) -> NavAction {
    let mut action = NavAction::None;
    if !dash.is_dropdown_open() {
        return action;
    }

    egui::Area::new(egui::Id::new("user_dropdown"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 44.0])
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(160.0);
                ui.label(RichText::new(dash.display_name()).strong().color(TEXT_PRIMARY));
                ui.separator();
                if ui.button("Sign out").clicked() {
                    action = NavAction::Logout;
                }
            });
        });

    action
}

pub fn sidebar(ui: &mut egui::Ui, dash: &Dashboard) -> NavAction {
    let mut action = NavAction::None;

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(RichText::new(dash.initials()).strong().color(ACCENT).size(18.0));
        ui.label(RichText::new(dash.display_name()).color(TEXT_PRIMARY));
    });
    ui.separator();

    for section in Section::ALL {
        let text = format!("{}  {}", section.icon(), section.label());
        if ui
            .selectable_label(dash.section() == section, RichText::new(text).size(15.0))
            .clicked()
        {
            action = NavAction::Switch(section);
        }
    }

    ui.add_space(12.0);
    ui.label(RichText::new("Wellness tools").color(TEXT_SECONDARY).small());
    for (kind, icon) in TOOLS {
        if ui.button(format!("{}  {}", icon, kind.title())).clicked() {
            action = NavAction::OpenModal(kind);
        }
    }

    action
}
