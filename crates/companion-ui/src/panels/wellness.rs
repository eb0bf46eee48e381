//! Wellness section: reminder overview and tool launchers.

use egui::{self, RichText};
use companion_core::modals::{ModalKind, ModalManager};
use crate::theme::*;

const CARDS: [(ModalKind, &str, &str); 4] = [
    (ModalKind::MoodJournal, "📓", "Track how you feel today"),
    (ModalKind::Music, "🎵", "Music matched to your mood"),
    (ModalKind::Wellness, "🧘", "Reminders and guided meditation"),
    (ModalKind::Mindfulness, "🌸", "A short grounding exercise"),
];

/// Returns the modal to open, if a card was clicked.
pub fn wellness_panel(ui: &mut egui::Ui, modals: &ModalManager) -> Option<ModalKind> {
    let mut open = None;

    ui.heading(RichText::new("Wellness").color(TEXT_PRIMARY).strong());
    ui.add_space(8.0);

    ui.horizontal_wrapped(|ui| {
        for (kind, icon, blurb) in CARDS {
            egui::Frame::default()
                .fill(BG_SECONDARY)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(egui::Margin::symmetric(16, 12))
                .show(ui, |ui| {
                    ui.set_width(200.0);
                    ui.label(RichText::new(format!("{} {}", icon, kind.title())).strong());
                    ui.label(RichText::new(blurb).color(TEXT_SECONDARY).small());
                    if ui.button("Open").clicked() {
                        open = Some(kind);
                    }
                });
        }
    });

    ui.add_space(12.0);
    ui.label(RichText::new("Today's reminders").strong().color(TEXT_PRIMARY));
    if modals.reminders().is_empty() {
        ui.label(RichText::new("All done for now").color(TEXT_SECONDARY).small());
    }
    for reminder in modals.reminders() {
        ui.label(format!("{} {}", reminder.icon(), reminder.message));
    }

    open
}
