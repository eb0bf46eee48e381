use egui::{self, RichText};
use crate::state::UiState;
use crate::theme::*;

/// Stacked toasts in the top-right corner. Returns the id of a toast the
/// user dismissed.
pub fn toasts(ctx: &egui::Context, state: &UiState) -> Option<u64> {
    let mut dismissed = None;
    if state.toasts.is_empty() {
        return None;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::RIGHT_TOP, [-12.0, 56.0])
        .order(egui::Order::Tooltip)
        .show(ctx, |ui| {
            for toast in &state.toasts {
                egui::Frame::default()
                    .fill(BG_SECONDARY)
                    .stroke(egui::Stroke::new(1.0, level_color(toast.level)))
                    .corner_radius(PANEL_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(&toast.message).color(level_color(toast.level)));
                            if ui.small_button("×").clicked() {
                                dismissed = Some(toast.id);
                            }
                        });
                    });
                ui.add_space(4.0);
            }
        });

    dismissed
}
