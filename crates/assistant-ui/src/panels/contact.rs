//! Contact panel: the four-field form with inline feedback.

use egui::{self, RichText, Vec2};
use crate::state::ContactForm;
use crate::theme::*;

/// Render the contact form. Returns true when Send was clicked.
pub fn contact_panel(ui: &mut egui::Ui, form: &mut ContactForm) -> bool {
    let mut submit = false;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.set_max_width(CONTENT_MAX_WIDTH);
            ui.heading(RichText::new("Contact Us").color(TEXT_PRIMARY).strong());
            ui.separator();

            field(ui, "Name", &mut form.fields.name);
            field(ui, "Email", &mut form.fields.email);
            field(ui, "Subject", &mut form.fields.subject);

            ui.label(RichText::new("Message").color(TEXT_SECONDARY).small());
            ui.add(
                egui::TextEdit::multiline(&mut form.fields.message)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY),
            );
            ui.add_space(12.0);

            ui.horizontal(|ui| {
                let label = if form.sending { "Sending..." } else { "Send Message" };
                let btn = ui.add_enabled(
                    !form.sending,
                    egui::Button::new(RichText::new(label).color(egui::Color32::WHITE).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(140.0, 28.0)),
                );
                if btn.clicked() {
                    submit = true;
                }

                if let Some(fb) = &form.feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color));
                }
            });
        });

    submit
}

fn field(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
    ui.add(egui::TextEdit::singleline(value).desired_width(f32::INFINITY));
    ui.add_space(4.0);
}
