// LogView - ui/panels/list_view.rs
//
// Compact list row: severity badge, timestamp and the first body line on
// top, attributes underneath. Always two lines high.

use crate::core::model::LogRecord;
use crate::ui::panels::logs_table::RowContext;
use crate::ui::{text, theme};
use egui::text::{LayoutJob, TextFormat};

/// Fixed number of text lines in a list row.
pub const LIST_ROW_LINES: u32 = 2;

pub fn render(ui: &mut egui::Ui, ctx: &RowContext, log: &LogRecord) {
    let sev_colour = theme::severity_colour(&log.severity, ctx.dark_mode);
    let body_colour = theme::row_text_colour(ctx.dark_mode);
    let weak = ui.style().visuals.weak_text_color();
    let font = ctx.font_id.clone();

    let ts = log
        .timestamp
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "--".to_string());
    let first_line = log.body.lines().next().unwrap_or(&log.body);

    let mut head = LayoutJob::default();
    head.append(
        &format!("[{:<4}] ", log.severity.short_label()),
        0.0,
        TextFormat {
            font_id: font.clone(),
            color: sev_colour,
            ..Default::default()
        },
    );
    head.append(
        &format!("{ts}  "),
        0.0,
        TextFormat {
            font_id: font.clone(),
            color: weak,
            ..Default::default()
        },
    );
    head.append(
        first_line,
        0.0,
        TextFormat {
            font_id: font.clone(),
            color: body_colour,
            ..Default::default()
        },
    );
    head.wrap.max_rows = 1;
    head.wrap.break_anywhere = true;
    head.wrap.max_width = ui.available_width().max(1.0);
    head.wrap.overflow_character = Some('\u{2026}');

    let mut attrs = LayoutJob::default();
    for (key, value) in &log.attributes {
        attrs.append(
            &format!("{key}={value}"),
            0.0,
            TextFormat {
                font_id: font.clone(),
                color: body_colour,
                background: theme::chip_bg_colour(ctx.dark_mode),
                ..Default::default()
            },
        );
        attrs.append(
            "  ",
            0.0,
            TextFormat {
                font_id: font.clone(),
                ..Default::default()
            },
        );
    }
    attrs.wrap.max_rows = 1;
    attrs.wrap.break_anywhere = true;
    attrs.wrap.max_width = ui.available_width().max(1.0);
    attrs.wrap.overflow_character = Some('\u{2026}');

    let head = ui.fonts(|f| f.layout_job(head));
    let attrs = ui.fonts(|f| f.layout_job(attrs));

    let line_height = (ctx.row_height - theme::ROW_VERTICAL_PADDING) / LIST_ROW_LINES as f32;
    let width = ui.available_width();
    text::cell(ui, width, ctx.row_height, |ui| {
        ui.spacing_mut().item_spacing.y = 0.0;
        ui.add(egui::Label::new(head).selectable(false))
            .on_hover_text(log.id.as_str());
        if log.attributes.is_empty() {
            ui.add_space(line_height);
        } else {
            ui.add(egui::Label::new(attrs).selectable(false));
        }
    });
}
