// LogView - gui.rs
//
// Top-level eframe::App implementation.
// Wires together all UI panels and manages the ingest and live tail lifecycles.

use crate::app::font_watch::{DirectoryFontSource, FontObserver, FontRequest};
use crate::app::ingest::IngestManager;
use crate::app::state::{AppState, TailRequest};
use crate::app::tail::{TailConfig, TailManager};
use crate::core::model::{IngestProgress, LiveTailStatus, LogRecord, TailProgress};
use crate::ui;
use crate::ui::panels::logs_table::LogsTable;
use std::sync::Arc;
use std::time::Duration;

/// The LogView application.
pub struct LogViewApp {
    pub state: AppState,
    pub logs_table: LogsTable,
    pub ingest: IngestManager,
    pub tail: TailManager,
}

impl LogViewApp {
    /// Create a new application instance. The raw view font is looked up in
    /// the system font directories.
    pub fn new(state: AppState) -> Self {
        let font = FontObserver::new(
            FontRequest {
                family: state.config.font_family.clone(),
                weight: state.config.font_weight,
            },
            Duration::from_millis(state.config.font_timeout_ms),
            Arc::new(DirectoryFontSource::system()),
        );
        let logs_table = LogsTable::new(&state.store, font);
        Self {
            state,
            logs_table,
            ingest: IngestManager::new(),
            tail: TailManager::new(),
        }
    }

    fn tail_config(&self) -> TailConfig {
        TailConfig {
            poll_interval_ms: self.state.config.tail_poll_interval_ms,
            max_logs: self.state.config.max_logs,
        }
    }

    fn poll_ingest(&mut self) -> bool {
        let messages = self.ingest.poll_progress();
        let had_messages = !messages.is_empty();
        for msg in messages {
            match msg {
                IngestProgress::Started { path } => {
                    self.state.status_message = format!("Loading {}...", path.display());
                }
                IngestProgress::Completed {
                    path,
                    records,
                    duration,
                } => {
                    self.state.status_message = format!(
                        "Loaded {records} records from {} in {:.2}s",
                        path.display(),
                        duration.as_secs_f64()
                    );
                }
                IngestProgress::Failed { error } => {
                    self.state.status_message = format!("Load failed: {error}");
                    self.state.push_warning(error);
                }
                IngestProgress::Cancelled => {
                    self.state.status_message = "Load cancelled.".to_string();
                }
            }
        }
        had_messages
    }

    fn poll_tail(&mut self) -> bool {
        let messages = self.tail.poll_progress();
        let had_messages = !messages.is_empty();
        for msg in messages {
            match msg {
                TailProgress::Started { path, offset } => {
                    self.state.status_message =
                        format!("Live tail following {} from byte {offset}.", path.display());
                }
                TailProgress::Appended { count, dropped } => {
                    if dropped > 0 {
                        tracing::debug!(count, dropped, "Live tail trimmed oldest records");
                    }
                }
                TailProgress::FileError { path, message } => {
                    let msg = format!("Tail warning: {}: {}", path.display(), message);
                    tracing::warn!("{}", msg);
                    self.state.push_warning(msg);
                }
                TailProgress::Stopped => {
                    self.state.status_message = "Live tail stopped.".to_string();
                }
            }
        }
        had_messages
    }

    /// Apply requests recorded by panels during the previous frame.
    fn handle_requests(&mut self) {
        if let Some(path) = self.state.pending_open.take() {
            if self.tail.is_active() {
                self.tail.stop();
            }
            self.state.close_detail();
            self.state.source_path = Some(path.clone());
            self.ingest.start(path, self.state.store.clone());
        }

        // A tail start waits for any load in flight so the load's result
        // cannot replace records the tail has already appended.
        if self.state.pending_tail == Some(TailRequest::Start) && self.ingest.is_active() {
            return;
        }

        match self.state.pending_tail.take() {
            Some(TailRequest::Start) => match self.state.source_path.clone() {
                Some(path) => {
                    let config = self.tail_config();
                    self.tail.start(path, self.state.store.clone(), config);
                }
                None => {
                    self.state.status_message = "Open a file before starting live tail.".to_string();
                }
            },
            Some(TailRequest::Pause) => {
                self.tail.pause();
                self.state.status_message = "Live tail paused.".to_string();
            }
            Some(TailRequest::Resume) => {
                self.tail.resume();
                self.state.status_message = "Live tail resumed.".to_string();
            }
            Some(TailRequest::Stop) => {
                self.tail.stop();
                self.state.status_message = "Live tail stopped.".to_string();
            }
            None => {}
        }
    }
}

impl eframe::App for LogViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_ingest = self.poll_ingest();
        if had_ingest || self.ingest.is_active() {
            ctx.request_repaint();
        }

        let had_tail = self.poll_tail();
        if had_tail || self.tail.is_active() {
            ctx.request_repaint_after(Duration::from_millis(
                self.state.config.tail_poll_interval_ms,
            ));
        }

        self.handle_requests();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open File\u{2026}").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_file() {
                            self.state.pending_open = Some(path);
                        }
                        ui.close_menu();
                    }
                    let can_reload = self.state.source_path.is_some() && !self.ingest.is_active();
                    if ui
                        .add_enabled(can_reload, egui::Button::new("Reload"))
                        .clicked()
                    {
                        self.state.pending_open = self.state.source_path.clone();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("View", |ui| {
                    let label = if self.state.config.dark_mode {
                        "Light Theme"
                    } else {
                        "Dark Theme"
                    };
                    if ui.button(label).clicked() {
                        self.state.config.dark_mode = !self.state.config.dark_mode;
                        ui::theme::apply(
                            ctx,
                            self.state.config.dark_mode,
                            self.state.config.font_size,
                        );
                        ui.close_menu();
                    }
                });
            });
        });

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui::panels::controls::render(ui, &mut self.state);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.state.store.snapshot().live_tail {
                    LiveTailStatus::Playing => {
                        ui.label(
                            egui::RichText::new(" \u{25cf} LIVE ")
                                .strong()
                                .color(ui::theme::LIVE_COLOUR)
                                .background_color(egui::Color32::from_rgba_premultiplied(
                                    34, 197, 94, 30,
                                )),
                        );
                        ui.separator();
                    }
                    LiveTailStatus::Paused => {
                        ui.label(egui::RichText::new(" PAUSED ").strong().weak());
                        ui.separator();
                    }
                    LiveTailStatus::Stopped => {}
                }
                ui.label(&self.state.status_message);
                if self.ingest.is_active() && ui.small_button("Cancel").clicked() {
                    self.ingest.cancel();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if self.state.debug_mode {
                        let font = self.logs_table.font();
                        ui.label(
                            egui::RichText::new(format!(
                                "font: {} {} ({:?})",
                                font.request().family,
                                font.request().weight,
                                font.status()
                            ))
                            .small()
                            .weak(),
                        );
                    }
                    let total = self.logs_table.snapshot().logs.len();
                    if total > 0 {
                        ui.label(format!("{total} records"));
                    }
                    if !self.state.warnings.is_empty() {
                        let warnings = &self.state.warnings;
                        ui.label(
                            egui::RichText::new(format!("\u{26A0} {}", warnings.len()))
                                .color(egui::Color32::from_rgb(251, 191, 36)),
                        )
                        .on_hover_ui(|ui| {
                            for w in warnings.iter().rev().take(10) {
                                ui.label(w);
                            }
                        });
                    }
                });
            });
        });

        egui::SidePanel::left("fields_sidebar")
            .default_width(ui::theme::SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| {
                ui::panels::fields::render(ui, &mut self.state);
            });

        if self.state.expanded.is_some() {
            egui::SidePanel::right("detail_panel")
                .default_width(ui::theme::DETAIL_PANEL_WIDTH)
                .resizable(true)
                .show(ctx, |ui| {
                    ui::panels::detail::render(ui, &mut self.state);
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let props = self.state.props;
            let state = &mut self.state;
            self.logs_table
                .show(ui, &props, &mut |log: &LogRecord| state.expand(log));
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.ingest.cancel();
        self.tail.stop();
    }
}
