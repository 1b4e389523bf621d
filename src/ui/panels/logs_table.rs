// LogView - ui/panels/logs_table.rs
//
// The logs view component. Each frame it:
//   1. drives the raw view font wait (raw mode only),
//   2. refreshes its store snapshot when the store reports a change,
//   3. selects a frame (spinner, or heading + notice + body),
//   4. routes the body to the table renderer or through the virtualizer.
//
// The component only reads the store. Expand requests go out through the
// caller's callback.

use crate::app::font_watch::{FontObserver, FontStatus};
use crate::core::dispatch::{Body, Row, RowStyle};
use crate::core::model::{LiveTailStatus, LogRecord, LogsState, ViewMode};
use crate::core::presentation::{self, Frame, LogsTableProps, Notice};
use crate::core::store::{LogStore, Subscription};
use crate::core::virtualize::Virtualizer;
use crate::ui::panels::{list_view, raw_view, table_view};
use crate::ui::virtual_list::ScrollVirtualizer;
use crate::ui::{fonts, theme};
use crate::util::constants;
use std::sync::Arc;
use std::time::Duration;

/// Per-frame values every row renderer needs.
#[derive(Debug, Clone)]
pub struct RowContext {
    pub row_height: f32,
    pub font_id: egui::FontId,
    pub dark_mode: bool,
}

/// Summary of what `LogsTable::show` drew.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    Loading,
    Content {
        heading: bool,
        notice: Option<Notice>,
        /// Records handed to the body renderer.
        rows: usize,
    },
}

pub struct LogsTable {
    subscription: Subscription,
    store: LogStore,
    snapshot: Arc<LogsState>,
    font: FontObserver,
    /// Set once the raw font has been registered and egui has applied it.
    raw_family: Option<egui::FontFamily>,
    raw_family_installed: bool,
}

impl LogsTable {
    pub fn new(store: &LogStore, font: FontObserver) -> Self {
        let subscription = store.subscribe();
        Self {
            subscription,
            store: store.clone(),
            snapshot: store.snapshot(),
            font,
            raw_family: None,
            raw_family_installed: false,
        }
    }

    pub fn font(&self) -> &FontObserver {
        &self.font
    }

    pub fn font_status(&self) -> FontStatus {
        self.font.status()
    }

    /// Snapshot the last frame was drawn from.
    pub fn snapshot(&self) -> &LogsState {
        &self.snapshot
    }

    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        props: &LogsTableProps,
        on_click_expand: &mut dyn FnMut(&LogRecord),
    ) -> Shown {
        self.drive_font(ui.ctx(), props.view_mode);

        if self.subscription.changed() {
            self.snapshot = self.store.snapshot();
        }
        let snapshot = Arc::clone(&self.snapshot);

        match presentation::select_frame(props, &snapshot) {
            Frame::Loading => {
                ui.vertical_centered(|ui| {
                    ui.add_space(ui.available_height() / 3.0);
                    ui.add(egui::Spinner::new().size(theme::SPINNER_SIZE));
                    ui.label(constants::LOADING_TIP);
                });
                Shown::Loading
            }
            Frame::Content {
                show_heading,
                notice,
                body,
            } => {
                if show_heading {
                    ui.heading(constants::EVENT_HEADING);
                }
                if let Some(notice) = notice {
                    ui.label(egui::RichText::new(notice.text()).weak().italics());
                }

                let stick = snapshot.live_tail == LiveTailStatus::Playing;
                let rows = self.show_body(ui, body, stick, on_click_expand);
                Shown::Content {
                    heading: show_heading,
                    notice,
                    rows,
                }
            }
        }
    }

    fn show_body(
        &self,
        ui: &mut egui::Ui,
        body: Body<'_>,
        stick: bool,
        on_click_expand: &mut dyn FnMut(&LogRecord),
    ) -> usize {
        let dark_mode = ui.visuals().dark_mode;
        match body {
            Body::Table(spec) => {
                let ctx = RowContext {
                    row_height: theme::row_height(ui, spec.lines_per_row.get()),
                    font_id: egui::TextStyle::Monospace.resolve(ui.style()),
                    dark_mode,
                };
                table_view::render(ui, &ctx, spec, stick, on_click_expand);
                spec.logs.len()
            }
            Body::Virtualized(list) => {
                let lines = match list.style() {
                    RowStyle::Raw => list.lines_per_row().get(),
                    RowStyle::List => list_view::LIST_ROW_LINES,
                };
                let mono = egui::TextStyle::Monospace.resolve(ui.style());
                let font_id = match (&self.raw_family, list.style()) {
                    (Some(family), RowStyle::Raw) => {
                        egui::FontId::new(mono.size, family.clone())
                    }
                    _ => mono,
                };
                let ctx = RowContext {
                    row_height: theme::row_height(ui, lines),
                    font_id,
                    dark_mode,
                };

                ScrollVirtualizer::new(ui, "logs_view_rows", ctx.row_height)
                    .stick_to_bottom(stick)
                    .render(list.total_count(), &mut |ui: &mut egui::Ui, index: usize| {
                        let Some(row) = list.item_content(index) else {
                            return;
                        };
                        ui.push_id(row.key(), |ui| match row {
                            Row::Raw { log, lines_per_row } => {
                                raw_view::render(ui, &ctx, log, lines_per_row, on_click_expand)
                            }
                            Row::List { log } => list_view::render(ui, &ctx, log),
                        });
                    });
                list.total_count()
            }
        }
    }

    /// Font readiness effect. Only raw mode waits for the font.
    fn drive_font(&mut self, ctx: &egui::Context, mode: ViewMode) {
        // `set_fonts` applies from the next frame on.
        if self.raw_family_installed && self.raw_family.is_none() {
            self.raw_family = Some(fonts::raw_family());
        }

        if let Some(font) = self.font.observe(mode == ViewMode::Raw) {
            fonts::install_raw_font(ctx, &font);
            self.raw_family_installed = true;
            ctx.request_repaint();
        }

        if let Some(remaining) = self.font.remaining() {
            ctx.request_repaint_after(remaining.min(Duration::from_millis(100)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::font_watch::{FontRequest, FontSource, LoadedFont};
    use crate::core::model::LinesPerRow;
    use crate::util::error::FontError;
    use std::sync::atomic::AtomicBool;

    struct Missing;

    impl FontSource for Missing {
        fn load(&self, request: &FontRequest, _: &AtomicBool) -> Result<LoadedFont, FontError> {
            Err(FontError::NotFound {
                family: request.family.clone(),
                weight: request.weight,
            })
        }
    }

    fn observer() -> FontObserver {
        FontObserver::new(
            FontRequest {
                family: "Fira Code".to_string(),
                weight: 300,
            },
            Duration::from_secs(5),
            Arc::new(Missing),
        )
    }

    fn props(view_mode: ViewMode) -> LogsTableProps {
        LogsTableProps {
            view_mode,
            lines_per_row: LinesPerRow::default(),
        }
    }

    /// Run one headless frame and return what the view drew.
    fn frame(ctx: &egui::Context, table: &mut LogsTable, props: &LogsTableProps) -> Shown {
        let mut shown = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                shown = Some(table.show(ui, props, &mut |_: &LogRecord| {}));
            });
        });
        shown.expect("frame ran")
    }

    fn records(n: usize) -> Vec<LogRecord> {
        (0..n)
            .map(|i| LogRecord::new(format!("id-{i}"), format!("line {i}")))
            .collect()
    }

    #[test]
    fn test_loading_shows_spinner_only() {
        let store = LogStore::default();
        store.replace_logs(records(3));
        store.set_loading(true);
        let mut table = LogsTable::new(&store, observer());
        let ctx = egui::Context::default();
        assert_eq!(frame(&ctx, &mut table, &props(ViewMode::Raw)), Shown::Loading);
    }

    #[test]
    fn test_empty_store_shows_no_logs_notice() {
        let store = LogStore::default();
        let mut table = LogsTable::new(&store, observer());
        let ctx = egui::Context::default();
        assert_eq!(
            frame(&ctx, &mut table, &props(ViewMode::List)),
            Shown::Content {
                heading: true,
                notice: Some(Notice::NoLogsFound),
                rows: 0,
            }
        );
    }

    #[test]
    fn test_table_mode_has_no_heading() {
        let store = LogStore::default();
        store.replace_logs(records(4));
        let mut table = LogsTable::new(&store, observer());
        let ctx = egui::Context::default();
        assert_eq!(
            frame(&ctx, &mut table, &props(ViewMode::Table)),
            Shown::Content {
                heading: false,
                notice: None,
                rows: 4,
            }
        );
    }

    #[test]
    fn test_store_changes_reach_next_frame() {
        let store = LogStore::default();
        store.set_live_tail(LiveTailStatus::Playing);
        let mut table = LogsTable::new(&store, observer());
        let ctx = egui::Context::default();
        assert_eq!(
            frame(&ctx, &mut table, &props(ViewMode::Raw)),
            Shown::Content {
                heading: true,
                notice: Some(Notice::WaitingForLiveLogs),
                rows: 0,
            }
        );

        store.append_logs(records(1_000), 100_000);
        assert_eq!(
            frame(&ctx, &mut table, &props(ViewMode::Raw)),
            Shown::Content {
                heading: true,
                notice: None,
                rows: 1_000,
            }
        );
        assert_eq!(table.snapshot().logs.len(), 1_000);
    }

    #[test]
    fn test_font_wait_only_starts_in_raw_mode() {
        let store = LogStore::default();
        let ctx = egui::Context::default();

        let mut table = LogsTable::new(&store, observer());
        frame(&ctx, &mut table, &props(ViewMode::List));
        frame(&ctx, &mut table, &props(ViewMode::Table));
        assert_eq!(table.font_status(), FontStatus::Idle);

        frame(&ctx, &mut table, &props(ViewMode::Raw));
        assert_ne!(table.font_status(), FontStatus::Idle);
    }

    #[test]
    fn test_missing_font_never_blocks_rendering() {
        let store = LogStore::default();
        store.replace_logs(records(2));
        let mut table = LogsTable::new(&store, observer());
        let ctx = egui::Context::default();
        for _ in 0..20 {
            let shown = frame(&ctx, &mut table, &props(ViewMode::Raw));
            assert!(matches!(shown, Shown::Content { rows: 2, .. }));
            if table.font_status() == FontStatus::Failed {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("font lookup did not settle");
    }
}
