// YAM Log Relay - ui/panels/log_window.rs
//
// The log window body: one monospace row per rendered line, coloured by
// kind.
//
// Uses egui's `ScrollArea::show_rows` so only visible rows are laid out;
// rows are truncated rather than wrapped to keep a fixed row height.
// When the relay has asked for the newest line to be shown (the buffer's
// scroll request) and follow mode is on, the view jumps to the bottom.

use crate::app::log_buffer::LogBuffer;
use crate::ui::theme;

/// Render the log lines into the current panel.
pub fn render(ui: &mut egui::Ui, buffer: &mut LogBuffer, dark_mode: bool, follow: bool) {
    // Consume the request even when not following, so it does not fire
    // later when follow mode is switched back on.
    let scroll_requested = buffer.take_scroll_request();

    if buffer.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label("No log messages yet.");
        });
        return;
    }

    let font = egui::FontId::monospace(theme::LOG_FONT_SIZE);
    let row_height = ui.fonts(|f| f.row_height(&font));
    let total = buffer.len();

    let mut area = egui::ScrollArea::vertical()
        .id_salt("log_window_rows")
        .auto_shrink([false; 2])
        .stick_to_bottom(follow);
    if follow && scroll_requested {
        let spacing = ui.spacing().item_spacing.y;
        area = area.vertical_scroll_offset((row_height + spacing) * total as f32);
    }

    area.show_rows(ui, row_height, total, |ui, row_range| {
        for index in row_range {
            let Some(line) = buffer.line(index) else {
                continue;
            };
            let text = egui::RichText::new(line.text.as_str())
                .font(font.clone())
                .color(theme::kind_colour(line.kind, dark_mode));
            ui.add(egui::Label::new(text).truncate());
        }
    });
}
