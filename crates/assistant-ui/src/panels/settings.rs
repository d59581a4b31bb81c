//! Settings panel: service endpoints, identity, retries, storage mode.
//! Explicit Save button with visual feedback.

use egui::{self, RichText, Vec2};
use assistant_types::config::{AppConfig, StorageBackendType};
use crate::state::Feedback;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed (not yet applied)
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Render the settings panel. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut AppConfig,
    save_feedback: Option<&Feedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Assistant Section ────────────────────────────
            section(ui, "Assistant");

            ui.label(RichText::new("Server URL").color(TEXT_SECONDARY).small());
            changed |= ui
                .text_edit_singleline(&mut config.gateway.base_url)
                .changed();

            ui.add_space(4.0);

            ui.label(RichText::new("Request timeout (ms)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.gateway.timeout_ms, 5_000..=120_000))
                .changed();

            ui.label(RichText::new("Automatic retries").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.retry.max_attempts, 0..=10))
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Account Section ──────────────────────────────
            section(ui, "Account");

            ui.label(RichText::new("User data URL").color(TEXT_SECONDARY).small());
            changed |= ui
                .text_edit_singleline(&mut config.user_data.base_url)
                .changed();

            ui.add_space(4.0);

            ui.label(RichText::new("User ID").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::TextEdit::singleline(&mut config.user_data.user_id).hint_text("generated"))
                .changed();

            ui.add_space(4.0);
            changed |= ui
                .checkbox(
                    &mut config.user_data.sync_after_turn,
                    "Save conversations to my account",
                )
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Storage Section ──────────────────────────────
            section(ui, "Storage");

            ui.label(RichText::new("Backend").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(config.storage.backend.label())
                .show_ui(ui, |ui| {
                    for backend in StorageBackendType::all() {
                        if ui
                            .selectable_value(&mut config.storage.backend, backend.clone(), backend.label())
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });

            ui.add_space(4.0);
            ui.label(
                RichText::new(storage_description(&config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(
                        RichText::new("Save Settings")
                            .color(egui::Color32::WHITE)
                            .strong(),
                    )
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }

                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });

            ui.label(
                RichText::new("Endpoints apply on save. Other changes apply after a reload.")
                    .color(TEXT_SECONDARY)
                    .small(),
            );
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

fn section(ui: &mut egui::Ui, title: &str) {
    ui.label(RichText::new(title).color(ACCENT).strong());
    ui.add_space(2.0);
}

pub fn storage_description(backend: &StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "Uses browser storage when available, otherwise keeps the conversation in memory.",
        StorageBackendType::Local => "Conversations survive page reloads and browser restarts.",
        StorageBackendType::Memory => "Nothing is saved. Conversations are lost on page reload.",
    }
}
