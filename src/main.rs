// LogView - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading (config.toml, then CLI overrides)
// 3. Logging initialisation (debug mode support)
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use logview::app;

pub use logview::core;
pub use logview::platform;
pub use logview::ui;
pub use logview::util;

use clap::Parser;
use crate::core::model::{LinesPerRow, ViewMode};
use std::path::{Path, PathBuf};

/// LogView - virtualized log viewer.
///
/// Open a log file and browse it as raw text, a compact list, or a table of
/// selected fields. Optionally follow the file for new lines.
#[derive(Parser, Debug)]
#[command(name = "LogView", version, about)]
struct Cli {
    /// Log file to open (use File > Open if omitted).
    path: Option<PathBuf>,

    /// Initial view mode: raw, list or table.
    #[arg(short = 'v', long = "view")]
    view: Option<ViewMode>,

    /// Lines shown per row in raw and table views.
    #[arg(short = 'l', long = "lines-per-row", value_parser = parse_lines_per_row)]
    lines_per_row: Option<LinesPerRow>,

    /// Follow the file for appended lines once it has loaded.
    #[arg(short = 't', long = "tail")]
    tail: bool,

    /// Directory containing config.toml (platform default if omitted).
    #[arg(short = 'c', long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn parse_lines_per_row(raw: &str) -> Result<LinesPerRow, String> {
    raw.parse()
}

/// Resolve the configured log file. Relative paths land in the data dir.
fn resolve_log_file(file: &str, data_dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(file);
    if path.is_absolute() {
        return Some(path);
    }
    match std::fs::create_dir_all(data_dir) {
        Ok(()) => Some(data_dir.join(path)),
        Err(e) => {
            eprintln!(
                "Warning: cannot create data directory '{}': {e}",
                data_dir.display()
            );
            None
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Config first: it can set the log level and log file.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_dir = cli
        .config_dir
        .as_deref()
        .unwrap_or(&platform_paths.config_dir);
    let (mut config, config_warnings) = platform::config::load_config(config_dir);

    let log_file = config
        .log_file
        .as_deref()
        .and_then(|f| resolve_log_file(f, &platform_paths.data_dir));
    let log_file = log_file.as_ref().and_then(|p| p.to_str());
    util::logging::init(cli.debug, config.log_level.as_deref(), log_file);

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogView starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    // CLI overrides config.
    if let Some(mode) = cli.view {
        config.default_mode = mode;
    }
    if let Some(lines) = cli.lines_per_row {
        config.lines_per_row = lines;
    }

    let dark_mode = config.dark_mode;
    let font_size = config.font_size;

    let store = crate::core::store::LogStore::default();
    let mut state = app::state::AppState::new(config, store, cli.debug);
    for warning in config_warnings {
        state.push_warning(warning);
    }

    if let Some(path) = cli.path {
        state.pending_open = Some(path);
        if cli.tail {
            state.pending_tail = Some(app::state::TailRequest::Start);
        }
    } else if cli.tail {
        tracing::warn!("--tail given without a file; ignoring");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            ui::theme::apply(&cc.egui_ctx, dark_mode, font_size);
            Ok(Box::new(gui::LogViewApp::new(state)))
        }),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LogView GUI: {e}");
        std::process::exit(1);
    }
}
