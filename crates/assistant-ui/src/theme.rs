//! UI theme constants

use egui::{Color32, CornerRadius, Stroke, Vec2};

pub const BG_PRIMARY: Color32 = Color32::from_rgb(255, 255, 255);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(243, 244, 246);
pub const BG_SURFACE: Color32 = Color32::from_rgb(229, 231, 235);
pub const BG_PENDING: Color32 = Color32::from_rgb(254, 249, 195);
pub const BG_FOOTER: Color32 = Color32::from_rgb(31, 41, 55);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(107, 114, 128);
pub const TEXT_ON_DARK: Color32 = Color32::from_rgb(243, 244, 246);
pub const ACCENT: Color32 = Color32::from_rgb(59, 130, 246);
pub const SUCCESS: Color32 = Color32::from_rgb(22, 163, 74);
pub const ERROR: Color32 = Color32::from_rgb(220, 38, 38);
pub const WARNING: Color32 = Color32::from_rgb(202, 138, 4);

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(8);
pub const PANEL_PADDING: Vec2 = Vec2::new(16.0, 12.0);
pub const CONTENT_MAX_WIDTH: f32 = 720.0;

/// Apply the light theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    style.visuals = egui::Visuals::light();
    style.visuals.panel_fill = BG_PRIMARY;
    style.visuals.window_fill = BG_PRIMARY;
    style.visuals.extreme_bg_color = BG_SECONDARY;
    style.visuals.hyperlink_color = ACCENT;

    style.visuals.widgets.inactive.bg_fill = BG_SECONDARY;
    style.visuals.widgets.inactive.weak_bg_fill = BG_SECONDARY;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.hovered.bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.weak_bg_fill = BG_SURFACE;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
    style.visuals.widgets.active.bg_fill = ACCENT;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    style.visuals.selection.bg_fill = ACCENT.linear_multiply(0.3);
    style.visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);

    ctx.set_style(style);
}
