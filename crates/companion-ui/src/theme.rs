//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};
use companion_types::event::NotifyLevel;

pub const BG_PRIMARY: Color32 = Color32::from_rgb(248, 250, 252);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(255, 255, 255);
pub const BG_SURFACE: Color32 = Color32::from_rgb(241, 245, 249);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(30, 41, 59);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(100, 116, 139);
pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241);
pub const ACCENT_SOFT: Color32 = Color32::from_rgb(224, 231, 255);
pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);
pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);
pub const WARNING: Color32 = Color32::from_rgb(234, 179, 8);
pub const INFO: Color32 = Color32::from_rgb(59, 130, 246);
pub const OVERLAY_BG: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 230);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(8);

pub fn level_color(level: NotifyLevel) -> Color32 {
    match level {
        NotifyLevel::Success => SUCCESS,
        NotifyLevel::Error => ERROR,
        NotifyLevel::Warning => WARNING,
        NotifyLevel::Info => INFO,
    }
}

/// Strength meter colour for a password score in `0..=5`
pub fn strength_color(score: u8) -> Color32 {
    match score {
        0 | 1 => ERROR,
        2 => Color32::from_rgb(249, 115, 22),
        3 => WARNING,
        4 => INFO,
        _ => SUCCESS,
    }
}

/// Apply the light theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_SECONDARY;
    style.visuals.extreme_bg_color = BG_SURFACE;

    style.visuals.widgets.inactive.bg_fill = BG_SURFACE;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.hovered.bg_fill = ACCENT_SOFT;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.4);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
