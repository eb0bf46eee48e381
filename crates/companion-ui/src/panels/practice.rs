//! Full-screen countdown for a running practice session.

use egui::{self, RichText};
use companion_core::practice::TimedPracticeSession;
use crate::theme::*;

/// Returns `true` when the stop button was pressed.
pub fn practice_overlay(ctx: &egui::Context, session: &TimedPracticeSession) -> bool {
    let mut stop = false;

    egui::Modal::new(egui::Id::new("practice_overlay"))
        .backdrop_color(OVERLAY_BG)
        .show(ctx, |ui| {
            ui.set_width(320.0);
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(session.kind.title()).color(TEXT_SECONDARY));
                ui.label(RichText::new(session.clock()).size(48.0).strong().color(ACCENT));
                ui.label(RichText::new(&session.instructions).color(TEXT_PRIMARY));
                ui.add_space(8.0);
                ui.add(egui::ProgressBar::new(session.progress()).fill(ACCENT));
                ui.add_space(8.0);
                if ui.button(session.kind.stop_label()).clicked() {
                    stop = true;
                }
            });
        });

    stop
}
