// LogView - ui/theme.rs
//
// Colour scheme, severity colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::Severity;
use egui::Color32;

/// Colour for a given severity level.
///
/// Light mode uses darker shades so badges stay legible on a white panel.
pub fn severity_colour(severity: &Severity, dark_mode: bool) -> Color32 {
    match (severity, dark_mode) {
        (Severity::Critical, _) => Color32::from_rgb(220, 38, 38), // Red 600
        (Severity::Error, true) => Color32::from_rgb(248, 113, 113), // Red 400
        (Severity::Error, false) => Color32::from_rgb(185, 28, 28), // Red 800
        (Severity::Warning, true) => Color32::from_rgb(251, 191, 36), // Amber 400
        (Severity::Warning, false) => Color32::from_rgb(180, 83, 9), // Amber 700
        (Severity::Info, true) => Color32::from_rgb(96, 165, 250), // Blue 400
        (Severity::Info, false) => Color32::from_rgb(29, 78, 216), // Blue 700
        (Severity::Debug, _) => Color32::from_rgb(107, 114, 128), // Gray 500
        (Severity::Unknown, _) => Color32::from_rgb(75, 85, 99),  // Gray 600
    }
}

/// Foreground colour for row text.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(229, 231, 235) // Gray 200
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Attribute chip background in the list view.
pub fn chip_bg_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(55, 65, 81) // Gray 700
    } else {
        Color32::from_rgb(229, 231, 235) // Gray 200
    }
}

/// Live tail badge colour.
pub const LIVE_COLOUR: Color32 = Color32::from_rgb(34, 197, 94); // Green 500

/// Layout constants.
pub const SIDEBAR_WIDTH: f32 = 220.0;
pub const DETAIL_PANEL_WIDTH: f32 = 380.0;
pub const ROW_VERTICAL_PADDING: f32 = 4.0;
pub const SPINNER_SIZE: f32 = 20.0;
pub const EXPAND_BUTTON_WIDTH: f32 = 18.0;
pub const TIMESTAMP_COLUMN_WIDTH: f32 = 200.0;
pub const FIELD_COLUMN_WIDTH: f32 = 140.0;
pub const MIN_BODY_COLUMN_WIDTH: f32 = 200.0;

/// Height of a fixed-height row showing `lines` lines of monospace text.
///
/// Virtualized rows must all have this exact height.
pub fn row_height(ui: &egui::Ui, lines: u32) -> f32 {
    let line = ui.text_style_height(&egui::TextStyle::Monospace);
    line * lines.max(1) as f32 + ROW_VERTICAL_PADDING
}

/// Apply the configured theme and base font size to `ctx`.
pub fn apply(ctx: &egui::Context, dark_mode: bool, font_size: f32) {
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            font_id.size = match text_style {
                egui::TextStyle::Heading => font_size * 1.4,
                egui::TextStyle::Small => font_size * 0.75,
                _ => font_size,
            };
        }
    });
}
