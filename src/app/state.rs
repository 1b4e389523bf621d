// LogView - app/state.rs
//
// Application state: view props, the expanded record, status text and
// requests raised by panels for the app shell to act on.
// Owned by the eframe::App implementation. Log data itself lives in the
// shared `LogStore`.

use crate::core::model::{LinesPerRow, LogRecord, ViewMode};
use crate::core::presentation::LogsTableProps;
use crate::core::store::LogStore;
use crate::platform::config::AppConfig;
use std::path::PathBuf;

/// Live tail action requested by a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailRequest {
    Start,
    Pause,
    Resume,
    Stop,
}

/// Top-level application state.
#[derive(Debug)]
pub struct AppState {
    /// Validated configuration.
    pub config: AppConfig,

    /// Shared logs state. Cloned into background workers.
    pub store: LogStore,

    /// Props handed to the logs view every frame.
    pub props: LogsTableProps,

    /// Record opened via a row's expand button.
    pub expanded: Option<LogRecord>,

    /// File currently loaded (and followed when tailing).
    pub source_path: Option<PathBuf>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config, ingest, tail).
    pub warnings: Vec<String>,

    /// File chosen in a panel, to be loaded by the shell.
    pub pending_open: Option<PathBuf>,

    /// Tail action chosen in a panel, to be applied by the shell.
    pub pending_tail: Option<TailRequest>,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(config: AppConfig, store: LogStore, debug_mode: bool) -> Self {
        let props = LogsTableProps {
            view_mode: config.default_mode,
            lines_per_row: config.lines_per_row,
        };
        if !config.selected_fields.is_empty() {
            store.set_selected_fields(config.selected_fields.clone());
        }
        Self {
            config,
            store,
            props,
            expanded: None,
            source_path: None,
            status_message: "Ready. Open a log file to begin.".to_string(),
            warnings: Vec::new(),
            pending_open: None,
            pending_tail: None,
            debug_mode,
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.props.view_mode != mode {
            tracing::debug!(from = %self.props.view_mode, to = %mode, "View mode changed");
            self.props.view_mode = mode;
        }
    }

    pub fn set_lines_per_row(&mut self, lines: LinesPerRow) {
        self.props.lines_per_row = lines;
    }

    /// Expand callback target: open the detail panel on `log`.
    pub fn expand(&mut self, log: &LogRecord) {
        tracing::debug!(id = %log.id, "Expanding log record");
        self.expanded = Some(log.clone());
    }

    pub fn close_detail(&mut self) {
        self.expanded = None;
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_applies_config_to_props_and_store() {
        let config = AppConfig {
            default_mode: ViewMode::List,
            lines_per_row: LinesPerRow::new(5).unwrap(),
            selected_fields: vec!["host".to_string()],
            ..AppConfig::default()
        };
        let store = LogStore::default();
        let state = AppState::new(config, store.clone(), false);
        assert_eq!(state.props.view_mode, ViewMode::List);
        assert_eq!(state.props.lines_per_row.get(), 5);
        assert_eq!(store.snapshot().fields.selected, vec!["host".to_string()]);
    }

    #[test]
    fn test_expand_and_close_detail() {
        let mut state = AppState::new(AppConfig::default(), LogStore::default(), false);
        state.expand(&LogRecord::new("7", "body"));
        assert_eq!(state.expanded.as_ref().map(|l| l.id.as_str()), Some("7"));
        state.close_detail();
        assert!(state.expanded.is_none());
    }
}
