// YAM Log Relay - ui/panels/status_bar.rs
//
// Bottom status bar: retained/rendered line counts and relay health.

use crate::core::model::RelayStats;
use crate::ui::theme;

/// Render the status bar contents.
pub fn render(ui: &mut egui::Ui, stats: &RelayStats, retained: usize, burst_active: bool) {
    ui.horizontal(|ui| {
        if burst_active {
            ui.label(
                egui::RichText::new(" \u{25cf} PRODUCING ")
                    .strong()
                    .color(egui::Color32::from_rgb(34, 197, 94)) // Green 500
                    .background_color(egui::Color32::from_rgba_premultiplied(34, 197, 94, 30)),
            );
            ui.separator();
        }

        ui.label(
            egui::RichText::new(format!(
                "{retained} lines shown \u{00b7} {} rendered \u{00b7} {} trimmed",
                stats.rendered, stats.trimmed
            ))
            .color(theme::STATUS_TEXT),
        );

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if stats.misuse > 0 {
                ui.colored_label(
                    egui::Color32::from_rgb(253, 186, 116),
                    format!("{} misuse diagnostics", stats.misuse),
                );
            }
            if stats.pending > 0 {
                ui.label(format!("{} queued", stats.pending));
            }
        });
    });
}
