// LogView - platform/config.rs
//
// Platform-specific directory resolution and config.toml loading with
// startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{LinesPerRow, ViewMode};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogView configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logview/ or %APPDATA%\LogView\config\)
    pub config_dir: PathBuf,

    /// Data directory for logs, caches, etc.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();
            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );
            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub view: ViewSection,
    pub font: FontSection,
    pub tail: TailSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// "raw", "table" or "list".
    pub default_mode: Option<String>,
    pub lines_per_row: Option<u32>,
    /// Table columns selected at startup.
    pub selected_fields: Option<Vec<String>>,
}

/// `[font]` config section: the raw view font.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FontSection {
    pub family: Option<String>,
    pub weight: Option<u16>,
    pub timeout_ms: Option<u64>,
}

/// `[tail]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct TailSection {
    pub poll_interval_ms: Option<u64>,
    pub max_logs: Option<usize>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- View --
    pub default_mode: ViewMode,
    pub lines_per_row: LinesPerRow,
    pub selected_fields: Vec<String>,

    // -- Font --
    pub font_family: String,
    pub font_weight: u16,
    pub font_timeout_ms: u64,

    // -- Tail --
    pub tail_poll_interval_ms: u64,
    pub max_logs: usize,

    // -- UI --
    pub dark_mode: bool,
    pub font_size: f32,

    // -- Logging --
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_mode: ViewMode::default(),
            lines_per_row: LinesPerRow::default(),
            selected_fields: Vec::new(),
            font_family: constants::DEFAULT_RAW_FONT_FAMILY.to_string(),
            font_weight: constants::DEFAULT_RAW_FONT_WEIGHT,
            font_timeout_ms: constants::DEFAULT_FONT_TIMEOUT_MS,
            tail_poll_interval_ms: constants::TAIL_POLL_INTERVAL_MS,
            max_logs: constants::DEFAULT_MAX_LOGS,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from `config_dir`.
///
/// Missing file: defaults, no warnings. Unreadable or unparseable file:
/// defaults plus a warning, so the application still starts.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(source) => {
            let err = ConfigError::Io {
                path: config_path,
                source,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(source) => {
            let err = ConfigError::TomlParse {
                path: config_path,
                source,
            };
            tracing::warn!(error = %err, "Using default configuration");
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    validate(raw)
}

fn out_of_range(field: &str, value: impl ToString, expected: impl ToString) -> String {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .to_string()
}

/// Validate each field against named constants, accumulating all warnings.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();

    // -- View --
    if let Some(ref mode) = raw.view.default_mode {
        match mode.parse::<ViewMode>() {
            Ok(m) => config.default_mode = m,
            Err(_) => warnings.push(out_of_range(
                "[view] default_mode",
                mode,
                "raw, table or list",
            )),
        }
    }
    if let Some(lines) = raw.view.lines_per_row {
        match LinesPerRow::new(lines) {
            Some(l) => config.lines_per_row = l,
            None => warnings.push(out_of_range(
                "[view] lines_per_row",
                lines,
                format!(
                    "{}-{}",
                    constants::MIN_LINES_PER_ROW,
                    constants::MAX_LINES_PER_ROW
                ),
            )),
        }
    }
    if let Some(fields) = raw.view.selected_fields {
        let mut seen = Vec::with_capacity(fields.len());
        for f in fields {
            let f = f.trim().to_string();
            if !f.is_empty() && !seen.contains(&f) {
                seen.push(f);
            }
        }
        config.selected_fields = seen;
    }

    // -- Font --
    if let Some(ref family) = raw.font.family {
        if family.trim().is_empty() {
            warnings.push(out_of_range("[font] family", "", "a font family name"));
        } else {
            config.font_family = family.trim().to_string();
        }
    }
    if let Some(weight) = raw.font.weight {
        if (100..=900).contains(&weight) {
            config.font_weight = weight;
        } else {
            warnings.push(out_of_range("[font] weight", weight, "100-900"));
        }
    }
    if let Some(ms) = raw.font.timeout_ms {
        if (constants::MIN_FONT_TIMEOUT_MS..=constants::MAX_FONT_TIMEOUT_MS).contains(&ms) {
            config.font_timeout_ms = ms;
        } else {
            warnings.push(out_of_range(
                "[font] timeout_ms",
                ms,
                format!(
                    "{}-{}",
                    constants::MIN_FONT_TIMEOUT_MS,
                    constants::MAX_FONT_TIMEOUT_MS
                ),
            ));
        }
    }

    // -- Tail --
    if let Some(ms) = raw.tail.poll_interval_ms {
        if (constants::MIN_TAIL_POLL_INTERVAL_MS..=constants::MAX_TAIL_POLL_INTERVAL_MS)
            .contains(&ms)
        {
            config.tail_poll_interval_ms = ms;
        } else {
            warnings.push(out_of_range(
                "[tail] poll_interval_ms",
                ms,
                format!(
                    "{}-{}",
                    constants::MIN_TAIL_POLL_INTERVAL_MS,
                    constants::MAX_TAIL_POLL_INTERVAL_MS
                ),
            ));
        }
    }
    if let Some(max) = raw.tail.max_logs {
        if (constants::MIN_MAX_LOGS..=constants::ABSOLUTE_MAX_LOGS).contains(&max) {
            config.max_logs = max;
        } else {
            warnings.push(out_of_range(
                "[tail] max_logs",
                max,
                format!(
                    "{}-{}",
                    constants::MIN_MAX_LOGS,
                    constants::ABSOLUTE_MAX_LOGS
                ),
            ));
        }
    }

    // -- UI --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(out_of_range("[ui] theme", other, "dark or light")),
        }
    }
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(out_of_range(
                "[ui] font_size",
                size,
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            ));
        }
    }

    // -- Logging --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(out_of_range(
                "[logging] level",
                level,
                "error, warn, info, debug or trace",
            ));
        }
    }
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(toml_text: &str) -> (AppConfig, Vec<String>) {
        validate(toml::from_str(toml_text).expect("valid toml"))
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().expect("tmpdir");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let (config, warnings) = parse(
            r#"
            [view]
            default_mode = "table"
            lines_per_row = 4
            selected_fields = ["service", " host ", "service", ""]

            [font]
            family = "JetBrains Mono"
            weight = 400
            timeout_ms = 2500

            [tail]
            poll_interval_ms = 250
            max_logs = 5000

            [ui]
            theme = "light"

            [logging]
            level = "DEBUG"
            "#,
        );
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.default_mode, ViewMode::Table);
        assert_eq!(config.lines_per_row.get(), 4);
        assert_eq!(config.selected_fields, vec!["service", "host"]);
        assert_eq!(config.font_family, "JetBrains Mono");
        assert_eq!(config.font_weight, 400);
        assert_eq!(config.font_timeout_ms, 2500);
        assert_eq!(config.tail_poll_interval_ms, 250);
        assert_eq!(config.max_logs, 5000);
        assert!(!config.dark_mode);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_warn_and_fall_back() {
        let (config, warnings) = parse(
            r#"
            [view]
            default_mode = "grid"
            lines_per_row = 0

            [font]
            timeout_ms = 1

            [ui]
            theme = "neon"
            "#,
        );
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config.default_mode, ViewMode::Raw);
        assert_eq!(config.lines_per_row, LinesPerRow::default());
        assert_eq!(config.font_timeout_ms, constants::DEFAULT_FONT_TIMEOUT_MS);
        assert!(config.dark_mode);
    }

    #[test]
    fn test_unparseable_file_warns_and_uses_defaults() {
        let dir = TempDir::new().expect("tmpdir");
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), "[view\n").expect("write");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }
}
