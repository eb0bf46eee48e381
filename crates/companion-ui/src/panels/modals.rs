//! The four wellness modals. At most one is showing at a time.

use egui::{self, RichText};
use companion_core::modals::{MEDITATION_MINUTES, MINDFULNESS_MINUTES, ModalKind, ModalManager};
use companion_types::mood::{MOOD_SCALE_MAX, MOOD_SCALE_MIN};
use companion_types::wellness::MUSIC_MOODS;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    None,
    Close,
    SaveMood,
    Recommend,
    Play(&'static str),
    CompleteReminder(usize),
    StartMeditation,
    StartMindfulness,
}

pub fn modal_window(ctx: &egui::Context, modals: &mut ModalManager) -> ModalAction {
    let Some(kind) = modals.current() else {
        return ModalAction::None;
    };

    let mut action = ModalAction::None;
    let mut open = true;

    egui::Window::new(kind.title())
        .id(egui::Id::new("wellness_modal"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.set_min_width(340.0);
            action = match kind {
                ModalKind::MoodJournal => mood_journal(ui, modals),
                ModalKind::Music => music(ui, modals),
                ModalKind::Wellness => wellness(ui, modals),
                ModalKind::Mindfulness => mindfulness(ui, modals),
            };
        });

    if !open {
        return ModalAction::Close;
    }
    action
}

fn level_slider(ui: &mut egui::Ui, label: &str, value: &mut u8) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).color(TEXT_SECONDARY));
        ui.add(egui::Slider::new(value, MOOD_SCALE_MIN..=MOOD_SCALE_MAX));
    });
}

fn mood_journal(ui: &mut egui::Ui, modals: &mut ModalManager) -> ModalAction {
    let saving = modals.is_saving();
    let form = &mut modals.mood_form;
    level_slider(ui, "Mood", &mut form.mood);
    level_slider(ui, "Energy", &mut form.energy);
    level_slider(ui, "Stress", &mut form.stress);
    ui.label(RichText::new("Notes").color(TEXT_SECONDARY));
    ui.add(
        egui::TextEdit::multiline(&mut form.notes)
            .hint_text("How are you feeling?")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    let label = if saving { "Saving..." } else { "Save Entry" };
    let mut action = ModalAction::None;
    ui.horizontal(|ui| {
        if ui
            .add_enabled(
                !saving,
                egui::Button::new(RichText::new(label).color(egui::Color32::WHITE)).fill(ACCENT),
            )
            .clicked()
        {
            action = ModalAction::SaveMood;
        }
        if ui.button("Cancel").clicked() {
            action = ModalAction::Close;
        }
    });
    action
}

fn music(ui: &mut egui::Ui, modals: &mut ModalManager) -> ModalAction {
    let mut action = ModalAction::None;

    ui.horizontal(|ui| {
        ui.label(RichText::new("I'm feeling").color(TEXT_SECONDARY));
        egui::ComboBox::from_id_salt("music_mood")
            .selected_text(modals.music_mood.as_str())
            .show_ui(ui, |ui| {
                for mood in MUSIC_MOODS {
                    ui.selectable_value(&mut modals.music_mood, mood.to_string(), *mood);
                }
            });
        if ui.button("Recommend").clicked() {
            action = ModalAction::Recommend;
        }
    });
    ui.separator();

    for track in modals.recommendations() {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(RichText::new(track.title).strong().color(TEXT_PRIMARY));
                ui.label(
                    RichText::new(format!("{} · {}", track.artist, track.genre))
                        .color(TEXT_SECONDARY)
                        .small(),
                );
            });
            if ui.button("▶ Play").clicked() {
                action = ModalAction::Play(track.title);
            }
        });
    }

    action
}

fn wellness(ui: &mut egui::Ui, modals: &mut ModalManager) -> ModalAction {
    let mut action = ModalAction::None;

    ui.label(RichText::new("Reminders").strong().color(TEXT_PRIMARY));
    if modals.reminders().is_empty() {
        ui.label(RichText::new("All done for now").color(TEXT_SECONDARY).small());
    }
    for (i, reminder) in modals.reminders().iter().enumerate() {
        ui.horizontal(|ui| {
            ui.label(format!("{} {}", reminder.icon(), reminder.message));
            if ui.small_button("✔ Done").clicked() {
                action = ModalAction::CompleteReminder(i);
            }
        });
    }

    ui.separator();
    ui.label(RichText::new("Guided meditation").strong().color(TEXT_PRIMARY));
    ui.horizontal(|ui| {
        minutes_combo(ui, "meditation_minutes", &mut modals.meditation_minutes, MEDITATION_MINUTES);
        if ui.button("Start Meditation").clicked() {
            action = ModalAction::StartMeditation;
        }
    });

    action
}

fn mindfulness(ui: &mut egui::Ui, modals: &mut ModalManager) -> ModalAction {
    let mut action = ModalAction::None;

    ui.label(RichText::new(modals.mindfulness_prompt()).italics().color(TEXT_PRIMARY));
    ui.add_space(8.0);
    ui.horizontal(|ui| {
        minutes_combo(ui, "mindfulness_minutes", &mut modals.mindfulness_minutes, MINDFULNESS_MINUTES);
        if ui.button("Begin Practice").clicked() {
            action = ModalAction::StartMindfulness;
        }
    });

    action
}

fn minutes_combo(ui: &mut egui::Ui, id: &str, value: &mut u32, choices: &[u32]) {
    egui::ComboBox::from_id_salt(id)
        .selected_text(format!("{} min", value))
        .show_ui(ui, |ui| {
            for &m in choices {
                ui.selectable_value(value, m, format!("{} min", m));
            }
        });
}
