// LogView - ui/panels/controls.rs
//
// Toolbar: open file, view mode, lines per row and live tail controls.
// Panels only record requests on `AppState`; the app shell performs them.

use crate::app::state::{AppState, TailRequest};
use crate::core::model::{LinesPerRow, LiveTailStatus, ViewMode};
use crate::util::constants;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let live_tail = state.store.snapshot().live_tail;

    ui.horizontal(|ui| {
        if ui.button("Open\u{2026}").on_hover_text("Open a log file").clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Log files", &["log", "txt", "json", "jsonl", "ndjson"])
                .add_filter("All files", &["*"])
                .pick_file()
            {
                state.pending_open = Some(path);
            }
        }

        ui.separator();

        let mut mode = state.props.view_mode;
        for candidate in ViewMode::all() {
            ui.selectable_value(&mut mode, *candidate, candidate.label());
        }
        state.set_view_mode(mode);

        if mode.uses_lines_per_row() {
            ui.separator();
            let current = state.props.lines_per_row;
            egui::ComboBox::from_id_salt("lines_per_row")
                .selected_text(format!("{current} lines"))
                .show_ui(ui, |ui| {
                    for n in constants::MIN_LINES_PER_ROW..=constants::MAX_LINES_PER_ROW {
                        let Some(lines) = LinesPerRow::new(n) else {
                            continue;
                        };
                        if ui
                            .selectable_label(current == lines, format!("{n} lines"))
                            .clicked()
                        {
                            state.set_lines_per_row(lines);
                        }
                    }
                });
        }

        ui.separator();
        tail_controls(ui, state, live_tail);
    });
}

fn tail_controls(ui: &mut egui::Ui, state: &mut AppState, live_tail: LiveTailStatus) {
    let has_source = state.source_path.is_some();
    ui.label("Live:");
    match live_tail {
        LiveTailStatus::Stopped => {
            if ui
                .add_enabled(has_source, egui::Button::new("\u{25B6} Play"))
                .on_hover_text("Follow the open file for new lines")
                .on_disabled_hover_text("Open a file first")
                .clicked()
            {
                state.pending_tail = Some(TailRequest::Start);
            }
        }
        LiveTailStatus::Playing => {
            if ui.button("\u{23F8} Pause").clicked() {
                state.pending_tail = Some(TailRequest::Pause);
            }
            if ui.button("\u{23F9} Stop").clicked() {
                state.pending_tail = Some(TailRequest::Stop);
            }
        }
        LiveTailStatus::Paused => {
            if ui.button("\u{25B6} Resume").clicked() {
                state.pending_tail = Some(TailRequest::Resume);
            }
            if ui.button("\u{23F9} Stop").clicked() {
                state.pending_tail = Some(TailRequest::Stop);
            }
        }
    }
}
