// LogView - ui/panels/table_view.rs
//
// Columnar view: timestamp, one column per selected field, then the body.
// Receives the whole collection and virtualizes its own rows; cells are
// clipped to the configured number of lines.

use crate::core::dispatch::TableSpec;
use crate::core::model::LogRecord;
use crate::core::virtualize::Virtualizer;
use crate::ui::panels::logs_table::RowContext;
use crate::ui::virtual_list::ScrollVirtualizer;
use crate::ui::{text, theme};
use crate::util::constants;

/// Column widths for the current viewport.
struct Columns {
    timestamp: f32,
    field: f32,
    body: f32,
}

impl Columns {
    fn fit(available: f32, field_count: usize, spacing: f32) -> Self {
        let fixed = theme::EXPAND_BUTTON_WIDTH
            + theme::TIMESTAMP_COLUMN_WIDTH
            + theme::FIELD_COLUMN_WIDTH * field_count as f32
            + spacing * (field_count + 3) as f32;
        Self {
            timestamp: theme::TIMESTAMP_COLUMN_WIDTH,
            field: theme::FIELD_COLUMN_WIDTH,
            body: (available - fixed).max(theme::MIN_BODY_COLUMN_WIDTH),
        }
    }
}

pub fn render(
    ui: &mut egui::Ui,
    ctx: &RowContext,
    spec: TableSpec<'_>,
    stick_to_bottom: bool,
    on_click_expand: &mut dyn FnMut(&LogRecord),
) {
    let spacing = 6.0;
    let columns = Columns::fit(ui.available_width(), spec.fields.len(), spacing);
    let header_height = ui.text_style_height(&egui::TextStyle::Body) + theme::ROW_VERTICAL_PADDING;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = spacing;
        ui.add_space(theme::EXPAND_BUTTON_WIDTH);
        header_cell(ui, columns.timestamp, header_height, "timestamp");
        for field in spec.fields {
            header_cell(ui, columns.field, header_height, field);
        }
        header_cell(ui, columns.body, header_height, "body");
    });
    ui.separator();

    let rows = spec.lines_per_row.get();
    let colour = theme::row_text_colour(ctx.dark_mode);

    ScrollVirtualizer::new(ui, "logs_table_rows", ctx.row_height)
        .stick_to_bottom(stick_to_bottom)
        .render(spec.logs.len(), &mut |ui: &mut egui::Ui, index: usize| {
            let Some(log) = spec.logs.get(index) else {
                return;
            };
            ui.push_id(log.id.as_str(), |ui| {
                ui.horizontal(|ui| {
                    ui.set_height(ctx.row_height);
                    ui.spacing_mut().item_spacing.x = spacing;

                    let sev_colour = theme::severity_colour(&log.severity, ctx.dark_mode);
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

                    let ts = log
                        .timestamp
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
                        .unwrap_or_else(|| constants::MISSING_CELL_TEXT.to_string());
                    body_cell(ui, ctx, columns.timestamp, 1, &ts, colour);

                    for field in spec.fields {
                        let value = log
                            .field(field)
                            .unwrap_or(std::borrow::Cow::Borrowed(constants::MISSING_CELL_TEXT));
                        body_cell(ui, ctx, columns.field, rows, &value, colour);
                    }

                    body_cell(ui, ctx, columns.body, rows, &log.body, colour);
                });
            });
        });
}

fn header_cell(ui: &mut egui::Ui, width: f32, height: f32, name: &str) {
    text::cell(ui, width, height, |ui| {
        ui.add(egui::Label::new(egui::RichText::new(name).strong()).truncate());
    });
}

fn body_cell(
    ui: &mut egui::Ui,
    ctx: &RowContext,
    width: f32,
    max_rows: u32,
    value: &str,
    colour: egui::Color32,
) {
    let galley = text::clipped(ui, value, width, max_rows, ctx.font_id.clone(), colour);
    text::cell(ui, width, ctx.row_height, |ui| {
        ui.add(egui::Label::new(galley).selectable(false))
            .on_hover_text(value);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_give_body_the_remaining_width() {
        let cols = Columns::fit(1200.0, 2, 6.0);
        let fixed = theme::EXPAND_BUTTON_WIDTH
            + theme::TIMESTAMP_COLUMN_WIDTH
            + theme::FIELD_COLUMN_WIDTH * 2.0
            + 6.0 * 5.0;
        assert!((cols.body - (1200.0 - fixed)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_columns_body_never_below_minimum() {
        let cols = Columns::fit(300.0, 8, 6.0);
        assert_eq!(cols.body, theme::MIN_BODY_COLUMN_WIDTH);
    }
}
