//! egui front end: panels, theme, and the UI-side state they render.

pub mod format;
pub mod panels;
pub mod state;
pub mod theme;
