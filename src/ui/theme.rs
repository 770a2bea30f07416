// YAM Log Relay - ui/theme.rs
//
// Colour scheme, log kind colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::model::LogKind;
use egui::Color32;

/// Foreground colour for a line of the given kind.
///
/// Plain lines use the high-contrast body colour; the other kinds keep their
/// hue in both modes but are darkened on light backgrounds.
pub fn kind_colour(kind: LogKind, dark_mode: bool) -> Color32 {
    match (kind, dark_mode) {
        (LogKind::Plain, _) => row_text_colour(dark_mode),
        (LogKind::Message, true) => Color32::from_rgb(96, 165, 250), // Blue 400
        (LogKind::Message, false) => Color32::from_rgb(29, 78, 216), // Blue 700
        (LogKind::Warning, true) => Color32::from_rgb(251, 191, 36), // Amber 400
        (LogKind::Warning, false) => Color32::from_rgb(180, 83, 9),  // Amber 700
        (LogKind::Error, true) => Color32::from_rgb(248, 113, 113),  // Red 400
        (LogKind::Error, false) => Color32::from_rgb(185, 28, 28),   // Red 700
    }
}

/// Body text colour for plain rows.
pub fn row_text_colour(dark_mode: bool) -> Color32 {
    if dark_mode {
        Color32::from_rgb(229, 231, 235) // Gray 200
    } else {
        Color32::from_rgb(17, 24, 39) // Gray 900
    }
}

/// Status bar colours.
pub const STATUS_BG: Color32 = Color32::from_rgb(31, 41, 55); // Gray 800
pub const STATUS_TEXT: Color32 = Color32::from_rgb(209, 213, 219); // Gray 300

/// Layout constants.
pub const LOG_FONT_SIZE: f32 = 12.5;
pub const STATUS_BAR_HEIGHT: f32 = 28.0;
pub const WINDOW_SIZE: [f32; 2] = [900.0, 600.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [480.0, 320.0];
