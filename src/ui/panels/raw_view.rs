// LogView - ui/panels/raw_view.rs
//
// Raw row: the record's text clipped to the configured number of lines,
// with an expand button that hands the record to the caller's callback.

use crate::core::model::{LinesPerRow, LogRecord, Severity};
use crate::ui::panels::logs_table::RowContext;
use crate::ui::{text, theme};

/// Render one raw row. The row occupies exactly `ctx.row_height`.
pub fn render(
    ui: &mut egui::Ui,
    ctx: &RowContext,
    log: &LogRecord,
    lines_per_row: LinesPerRow,
    on_click_expand: &mut dyn FnMut(&LogRecord),
) {
    let sev_colour = theme::severity_colour(&log.severity, ctx.dark_mode);

    // Accent strip under Critical / Error / Warning rows.
    if matches!(
        log.severity,
        Severity::Critical | Severity::Error | Severity::Warning
    ) {
        let cursor = ui.cursor().min;
        let strip = egui::Rect::from_min_size(
            egui::pos2(cursor.x, cursor.y + ctx.row_height - 2.0),
            egui::vec2(ui.available_width(), 2.0),
        );
        ui.painter().rect_filled(strip, 0.0, sev_colour);
    }

    ui.horizontal(|ui| {
        ui.set_height(ctx.row_height);
        ui.spacing_mut().item_spacing.x = 4.0;

        let expand = ui
            .add(
                egui::Button::new(egui::RichText::new("\u{25B8}").color(sev_colour))
                    .small()
                    .frame(false)
                    .min_size(egui::vec2(theme::EXPAND_BUTTON_WIDTH, ctx.row_height)),
            )
            .on_hover_text("Show details");
        if expand.clicked() {
            on_click_expand(log);
        }

        let width = ui.available_width();
        let galley = text::clipped(
            ui,
            &log.raw_line(),
            width,
            lines_per_row.get(),
            ctx.font_id.clone(),
            theme::row_text_colour(ctx.dark_mode),
        );
        let response = text::cell(ui, width, ctx.row_height, |ui| {
            ui.add(egui::Label::new(galley).sense(egui::Sense::click()))
        });
        if response.double_clicked() {
            on_click_expand(log);
        }
    });
}
