// LogView - ui/panels/fields.rs
//
// Field picker sidebar. Selected fields become table columns; interesting
// fields are the other names seen in the loaded records.

use crate::app::state::AppState;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let snapshot = state.store.snapshot();
    let mut toggled: Option<String> = None;

    ui.heading("Fields");
    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("fields_sidebar")
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Selected").strong());
            if snapshot.fields.selected.is_empty() {
                ui.label(egui::RichText::new("None").weak());
            }
            for name in &snapshot.fields.selected {
                let mut on = true;
                if ui.checkbox(&mut on, name.as_str()).changed() {
                    toggled = Some(name.clone());
                }
            }

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Available").strong());
            for name in &snapshot.fields.interesting {
                let mut on = false;
                if ui.checkbox(&mut on, name.as_str()).changed() {
                    toggled = Some(name.clone());
                }
            }
        });

    if let Some(name) = toggled {
        tracing::debug!(field = %name, "Toggling table field");
        state.store.toggle_selected_field(&name);
    }
}
