// LogView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogView";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// View defaults
// =============================================================================

/// Default number of text lines shown per raw/table row.
pub const DEFAULT_LINES_PER_ROW: u32 = 2;

/// Smallest allowed lines-per-row value.
pub const MIN_LINES_PER_ROW: u32 = 1;

/// Largest allowed lines-per-row value.
pub const MAX_LINES_PER_ROW: u32 = 10;

/// Tip shown under the spinner while logs are loading.
pub const LOADING_TIP: &str = "Getting Logs";

/// Notice shown when live tail is playing but nothing has arrived yet.
pub const LIVE_TAIL_WAITING_TEXT: &str = "Getting live logs...";

/// Notice shown when there is nothing to display and live tail is stopped.
pub const NO_LOGS_TEXT: &str = "No logs lines found";

/// Heading above the raw and list views.
pub const EVENT_HEADING: &str = "Event";

/// Placeholder for a table cell whose field is absent from the record.
pub const MISSING_CELL_TEXT: &str = "-";

// =============================================================================
// Font readiness
// =============================================================================

/// Monospace family requested for the raw view.
pub const DEFAULT_RAW_FONT_FAMILY: &str = "Fira Code";

/// CSS-style weight requested for the raw view font.
pub const DEFAULT_RAW_FONT_WEIGHT: u16 = 300;

/// Upper bound on the wait for the raw view font (ms).
pub const DEFAULT_FONT_TIMEOUT_MS: u64 = 5_000;

/// Minimum user-configurable font timeout (ms).
pub const MIN_FONT_TIMEOUT_MS: u64 = 100;

/// Maximum user-configurable font timeout (ms).
pub const MAX_FONT_TIMEOUT_MS: u64 = 60_000;

/// Directory recursion depth when searching system font directories.
pub const FONT_SEARCH_MAX_DEPTH: usize = 4;

/// Largest font file the observer will read into memory.
pub const MAX_FONT_FILE_BYTES: u64 = 32 * 1024 * 1024; // 32 MiB

// =============================================================================
// Ingest / live tail limits
// =============================================================================

/// Largest log file loaded in one go.
pub const MAX_INGEST_FILE_BYTES: u64 = 512 * 1024 * 1024; // 512 MiB

/// How often the tail watcher polls the followed file (ms).
pub const TAIL_POLL_INTERVAL_MS: u64 = 500;

/// How often the cancel flag is checked within each poll sleep (ms).
pub const TAIL_CANCEL_CHECK_INTERVAL_MS: u64 = 100;

/// Minimum user-configurable tail poll interval (ms).
pub const MIN_TAIL_POLL_INTERVAL_MS: u64 = 100;

/// Maximum user-configurable tail poll interval (ms).
pub const MAX_TAIL_POLL_INTERVAL_MS: u64 = 10_000;

/// Maximum bytes read from the followed file in one poll tick.
pub const MAX_TAIL_READ_BYTES_PER_TICK: usize = 512 * 1_024; // 512 KiB

/// Cap on an in-progress (newline-less) line buffer before it is discarded.
pub const MAX_TAIL_PARTIAL_BYTES: usize = MAX_TAIL_READ_BYTES_PER_TICK * 4;

/// Default cap on records held by the store while tailing.
pub const DEFAULT_MAX_LOGS: usize = 100_000;

/// Minimum user-configurable record cap.
pub const MIN_MAX_LOGS: usize = 1_000;

/// Maximum user-configurable record cap.
pub const ABSOLUTE_MAX_LOGS: usize = 1_000_000;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
