// LogView - ui/text.rs
//
// Text layout helpers shared by the row renderers.

use egui::text::{LayoutJob, TextFormat};
use egui::{Color32, FontId, Galley};
use std::sync::Arc;

/// Lay out `text` wrapped at `width`, showing at most `max_rows` rows and
/// ending with an ellipsis when clipped.
pub fn clipped(
    ui: &egui::Ui,
    text: &str,
    width: f32,
    max_rows: u32,
    font_id: FontId,
    colour: Color32,
) -> Arc<Galley> {
    let mut job = LayoutJob::single_section(
        text.to_owned(),
        TextFormat {
            font_id,
            color: colour,
            ..Default::default()
        },
    );
    job.wrap.max_width = width.max(1.0);
    job.wrap.max_rows = max_rows.max(1) as usize;
    job.wrap.break_anywhere = true;
    job.wrap.overflow_character = Some('\u{2026}');
    ui.fonts(|f| f.layout_job(job))
}

/// Reserve a `width` x `height` cell and draw `add_contents` inside it,
/// top-left aligned.
pub fn cell<R>(
    ui: &mut egui::Ui,
    width: f32,
    height: f32,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    ui.allocate_ui_with_layout(
        egui::vec2(width, height),
        egui::Layout::top_down(egui::Align::Min),
        |ui| {
            ui.set_width(width);
            ui.set_height(height);
            add_contents(ui)
        },
    )
    .inner
}
