// LogView - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::util::constants;

// =============================================================================
// Log record
// =============================================================================

/// A single log line as held by the store.
///
/// Records are read-only once they reach the store; renderers borrow them
/// and tolerate any attribute being absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRecord {
    /// Unique identifier. Also the row key used by every renderer.
    pub id: String,

    /// Parsed timestamp in UTC, if the source line carried one.
    pub timestamp: Option<DateTime<Utc>>,

    /// Normalised severity level.
    pub severity: Severity,

    /// Main message text, possibly spanning several lines.
    pub body: String,

    /// Arbitrary structured fields, ordered by name.
    pub attributes: BTreeMap<String, String>,
}

/// Field names every record answers to, independent of its attributes.
pub const BUILTIN_FIELDS: &[&str] = &["id", "timestamp", "severity", "body"];

impl LogRecord {
    /// Record with only an id and a body.
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            timestamp: None,
            severity: Severity::Unknown,
            body: body.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Value of a named field: built-ins first, then attributes.
    pub fn field(&self, name: &str) -> Option<Cow<'_, str>> {
        match name {
            "id" => Some(Cow::Borrowed(self.id.as_str())),
            "timestamp" => self.timestamp.map(|t| Cow::Owned(t.to_rfc3339())),
            "severity" => Some(Cow::Borrowed(self.severity.label())),
            "body" => Some(Cow::Borrowed(self.body.as_str())),
            other => self.attributes.get(other).map(|v| Cow::Borrowed(v.as_str())),
        }
    }

    /// Single-line rendering used by the raw view: timestamp, level, body.
    pub fn raw_line(&self) -> String {
        match self.timestamp {
            Some(ts) => format!(
                "{} {} {}",
                ts.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                self.severity.short_label(),
                self.body
            ),
            None => format!("{} {}", self.severity.short_label(), self.body),
        }
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Normalised severity levels, ordered from most to least severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum Severity {
    Critical,
    Error,
    Warning,
    Info,
    Debug,
    #[default]
    Unknown,
}

impl Severity {
    /// Returns all variants in display order (most severe first).
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Critical,
            Severity::Error,
            Severity::Warning,
            Severity::Info,
            Severity::Debug,
            Severity::Unknown,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Error => "Error",
            Severity::Warning => "Warning",
            Severity::Info => "Info",
            Severity::Debug => "Debug",
            Severity::Unknown => "Unknown",
        }
    }

    /// Short label for compact display (e.g. row badges).
    pub fn short_label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRIT",
            Severity::Error => "ERR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DBG",
            Severity::Unknown => "???",
        }
    }

    /// Map a free-form level string (`ERROR`, `warn`, `E`, `fatal`...) to a
    /// severity. Unrecognised strings map to `Unknown`.
    pub fn from_level(raw: &str) -> Severity {
        match raw.trim().to_ascii_lowercase().as_str() {
            "fatal" | "critical" | "crit" | "panic" | "emerg" | "alert" | "f" | "c" => {
                Severity::Critical
            }
            "error" | "err" | "e" => Severity::Error,
            "warning" | "warn" | "w" => Severity::Warning,
            "info" | "information" | "notice" | "i" => Severity::Info,
            "debug" | "dbg" | "trace" | "verbose" | "d" | "t" | "v" => Severity::Debug,
            _ => Severity::Unknown,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// View mode
// =============================================================================

/// How the log collection is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Raw,
    Table,
    List,
}

impl ViewMode {
    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Raw, ViewMode::Table, ViewMode::List]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Raw => "raw",
            ViewMode::Table => "table",
            ViewMode::List => "list",
        }
    }

    /// Label used on the view-mode selector.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Raw => "Raw",
            ViewMode::Table => "Table",
            ViewMode::List => "List",
        }
    }

    /// Whether the lines-per-row setting affects this mode.
    pub fn uses_lines_per_row(&self) -> bool {
        matches!(self, ViewMode::Raw | ViewMode::Table)
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "raw" => Ok(ViewMode::Raw),
            "table" => Ok(ViewMode::Table),
            "list" => Ok(ViewMode::List),
            other => Err(format!(
                "unknown view mode '{other}'; expected raw, table or list"
            )),
        }
    }
}

// =============================================================================
// Lines per row
// =============================================================================

/// Number of text lines a raw or table row may occupy. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinesPerRow(NonZeroU32);

impl LinesPerRow {
    /// `None` for zero or for values above the allowed maximum.
    pub fn new(lines: u32) -> Option<Self> {
        if lines > constants::MAX_LINES_PER_ROW {
            return None;
        }
        NonZeroU32::new(lines).map(Self)
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for LinesPerRow {
    fn default() -> Self {
        Self::new(constants::DEFAULT_LINES_PER_ROW).unwrap_or(Self(NonZeroU32::MIN))
    }
}

impl fmt::Display for LinesPerRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LinesPerRow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u32 = s
            .trim()
            .parse()
            .map_err(|e| format!("invalid lines per row '{s}': {e}"))?;
        Self::new(n).ok_or_else(|| {
            format!(
                "lines per row must be between {} and {}",
                constants::MIN_LINES_PER_ROW,
                constants::MAX_LINES_PER_ROW
            )
        })
    }
}

// =============================================================================
// Live tail status
// =============================================================================

/// Whether a live streaming session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LiveTailStatus {
    Playing,
    Paused,
    #[default]
    Stopped,
}

impl LiveTailStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LiveTailStatus::Playing => "PLAYING",
            LiveTailStatus::Paused => "PAUSED",
            LiveTailStatus::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for LiveTailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Store state
// =============================================================================

/// Field selection for the table view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldsState {
    /// Field names shown as table columns, in display order.
    pub selected: Vec<String>,

    /// Field names seen in the loaded logs that are not currently selected.
    pub interesting: Vec<String>,

    /// Attribute names seen since the last full replace.
    pub seen: BTreeSet<String>,
}

/// Everything the logs view reads from the store.
///
/// The records sit behind their own `Arc` so that flag and field updates
/// leave them shared with outstanding snapshots.
#[derive(Debug, Clone, Default)]
pub struct LogsState {
    pub logs: Arc<Vec<LogRecord>>,
    pub fields: FieldsState,
    pub is_loading: bool,
    pub live_tail: LiveTailStatus,
}

// =============================================================================
// Background progress (for UI updates)
// =============================================================================

/// Progress messages sent from the ingest thread to the UI thread.
#[derive(Debug, Clone)]
pub enum IngestProgress {
    /// Reading started.
    Started { path: PathBuf },

    /// The file was parsed and its records are now in the store.
    Completed {
        path: PathBuf,
        records: usize,
        duration: std::time::Duration,
    },

    /// Ingest failed; the store keeps its previous logs.
    Failed { error: String },

    /// Ingest was cancelled before the store was touched.
    Cancelled,
}

/// Progress messages sent from the live tail thread to the UI thread.
#[derive(Debug, Clone)]
pub enum TailProgress {
    /// The watcher is running from `offset`.
    Started { path: PathBuf, offset: u64 },

    /// New records were appended to the store.
    Appended { count: usize, dropped: usize },

    /// A non-fatal read error; the watcher keeps polling.
    FileError { path: PathBuf, message: String },

    /// The watcher thread has exited.
    Stopped,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_lookup_prefers_builtins() {
        let mut record = LogRecord::new("abc", "hello");
        record
            .attributes
            .insert("body".to_string(), "shadowed".to_string());
        record
            .attributes
            .insert("service".to_string(), "api".to_string());

        assert_eq!(record.field("id").as_deref(), Some("abc"));
        assert_eq!(record.field("body").as_deref(), Some("hello"));
        assert_eq!(record.field("service").as_deref(), Some("api"));
        assert_eq!(record.field("timestamp"), None);
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_view_mode_parse_is_case_insensitive() {
        assert_eq!("RAW".parse::<ViewMode>(), Ok(ViewMode::Raw));
        assert_eq!(" table ".parse::<ViewMode>(), Ok(ViewMode::Table));
        assert_eq!("list".parse::<ViewMode>(), Ok(ViewMode::List));
        assert!("grid".parse::<ViewMode>().is_err());
    }

    #[test]
    fn test_lines_per_row_rejects_zero_and_overflow() {
        assert!(LinesPerRow::new(0).is_none());
        assert!(LinesPerRow::new(constants::MAX_LINES_PER_ROW + 1).is_none());
        assert_eq!(LinesPerRow::new(3).map(|l| l.get()), Some(3));
        assert_eq!(
            LinesPerRow::default().get(),
            constants::DEFAULT_LINES_PER_ROW
        );
        assert!("0".parse::<LinesPerRow>().is_err());
    }

    #[test]
    fn test_severity_from_level_aliases() {
        assert_eq!(Severity::from_level("ERROR"), Severity::Error);
        assert_eq!(Severity::from_level("warn"), Severity::Warning);
        assert_eq!(Severity::from_level("Fatal"), Severity::Critical);
        assert_eq!(Severity::from_level("trace"), Severity::Debug);
        assert_eq!(Severity::from_level("loud"), Severity::Unknown);
    }

    #[test]
    fn test_live_tail_status_serialises_uppercase() {
        let json = serde_json::to_string(&LiveTailStatus::Playing).unwrap();
        assert_eq!(json, "\"PLAYING\"");
        let back: LiveTailStatus = serde_json::from_str("\"STOPPED\"").unwrap();
        assert_eq!(back, LiveTailStatus::Stopped);
    }
}
