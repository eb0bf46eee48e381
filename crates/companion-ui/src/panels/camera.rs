//! Emotion camera section.

use egui::{self, RichText, Vec2};
use companion_core::camera::CameraController;
use companion_core::ports::PreviewFrame;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    None,
    Start,
    Stop,
    Capture,
}

const PREVIEW_SIZE: Vec2 = Vec2::new(320.0, 240.0);

/// The start/stop button for the current lifecycle. An open still waiting
/// on the permission prompt can be cancelled.
pub fn lifecycle_control(active: bool, opening: bool) -> (&'static str, CameraAction) {
    if active {
        ("⏹ Stop Camera", CameraAction::Stop)
    } else if opening {
        ("✖ Cancel", CameraAction::Stop)
    } else {
        ("▶ Start Camera", CameraAction::Start)
    }
}

/// Turn a captured frame into an egui image. `None` for empty or
/// truncated frames.
pub fn preview_image(frame: &PreviewFrame) -> Option<egui::ColorImage> {
    if frame.width == 0 || frame.height == 0 || frame.rgba.len() != frame.width * frame.height * 4 {
        return None;
    }
    Some(egui::ColorImage::from_rgba_unmultiplied(
        [frame.width, frame.height],
        &frame.rgba,
    ))
}

pub fn camera_panel(
    ui: &mut egui::Ui,
    camera: &CameraController,
    preview: Option<&egui::TextureHandle>,
) -> CameraAction {
    let mut action = CameraAction::None;

    ui.heading(RichText::new("Emotion Camera").color(TEXT_PRIMARY).strong());
    ui.label(
        RichText::new("Let the camera read your expression every few seconds")
            .color(TEXT_SECONDARY),
    );
    ui.add_space(8.0);

    match preview.filter(|_| camera.is_active()) {
        Some(texture) => {
            ui.add(egui::Image::new((texture.id(), PREVIEW_SIZE)).corner_radius(PANEL_ROUNDING));
        }
        None => {
            let (rect, _) = ui.allocate_exact_size(PREVIEW_SIZE, egui::Sense::hover());
            ui.painter().rect_filled(rect, PANEL_ROUNDING, BG_SURFACE);
            let status = if camera.is_active() {
                "Waiting for video..."
            } else if camera.is_opening() {
                "Starting camera..."
            } else {
                "Camera off"
            };
            ui.painter().text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                status,
                egui::FontId::proportional(16.0),
                TEXT_SECONDARY,
            );
        }
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let (label, lifecycle) = lifecycle_control(camera.is_active(), camera.is_opening());
        if ui.button(label).clicked() {
            action = lifecycle;
        }

        let capture_label = if camera.is_analyzing() { "Analyzing..." } else { "📸 Capture" };
        if ui
            .add_enabled(!camera.is_analyzing(), egui::Button::new(capture_label))
            .clicked()
        {
            action = CameraAction::Capture;
        }

        if camera.realtime_indicator() {
            ui.label(RichText::new("Real-time").color(SUCCESS).small());
        }
    });

    ui.add_space(12.0);
    ui.label(RichText::new("Detected emotions").strong().color(TEXT_PRIMARY));
    if camera.results().is_empty() {
        ui.label(RichText::new("No emotions detected yet").color(TEXT_SECONDARY).small());
    }
    for result in camera.results() {
        ui.horizontal(|ui| {
            ui.label(format!("{} {}", result.icon(), result.label));
            ui.add(
                egui::ProgressBar::new(result.confidence)
                    .desired_width(160.0)
                    .fill(ACCENT)
                    .text(result.percent_label()),
            );
        });
    }

    action
}
