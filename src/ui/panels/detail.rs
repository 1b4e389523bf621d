// LogView - ui/panels/detail.rs
//
// Detail pane for the record opened via a row's expand button: built-in
// fields, attributes and the full body.

use crate::app::state::AppState;
use crate::ui::theme;

/// Render the detail pane (right side panel).
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let mut close = false;

    if let Some(log) = &state.expanded {
        ui.horizontal(|ui| {
            ui.heading("Details");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
                if ui
                    .button("Copy JSON")
                    .on_hover_text("Copy this record to the clipboard as JSON")
                    .clicked()
                {
                    match serde_json::to_string_pretty(log) {
                        Ok(json) => ui.ctx().copy_text(json),
                        Err(e) => tracing::warn!(error = %e, "Failed to serialise record"),
                    }
                }
            });
        });
        ui.separator();

        egui::Grid::new("detail_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .striped(true)
            .show(ui, |ui| {
                ui.label("Id:");
                ui.label(egui::RichText::new(&log.id).monospace());
                ui.end_row();

                ui.label("Severity:");
                ui.label(
                    egui::RichText::new(log.severity.label())
                        .color(theme::severity_colour(&log.severity, state.config.dark_mode)),
                );
                ui.end_row();

                if let Some(ts) = log.timestamp {
                    ui.label("Timestamp:");
                    ui.label(ts.to_rfc3339());
                    ui.end_row();
                }

                for (key, value) in &log.attributes {
                    ui.label(format!("{key}:"));
                    ui.label(egui::RichText::new(value).monospace());
                    ui.end_row();
                }
            });

        ui.separator();
        ui.label("Body:");
        egui::ScrollArea::vertical()
            .id_salt("detail_body")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.add(egui::Label::new(egui::RichText::new(&log.body).monospace()).wrap());
            });
    } else {
        ui.centered_and_justified(|ui| {
            ui.label("Expand a row to view details.");
        });
    }

    if close {
        state.close_detail();
    }
}
