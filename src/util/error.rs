// LogView - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all LogView operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum LogViewError {
    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// Loading or tailing a log file failed.
    Ingest(IngestError),

    /// Locating or reading the raw view font failed.
    Font(FontError),
}

impl fmt::Display for LogViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Ingest(e) => write!(f, "Ingest error: {e}"),
            Self::Font(e) => write!(f, "Font error: {e}"),
        }
    }
}

impl std::error::Error for LogViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Ingest(e) => Some(e),
            Self::Font(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for LogViewError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Ingest errors
// ---------------------------------------------------------------------------

/// Errors related to loading and following log files.
#[derive(Debug)]
pub enum IngestError {
    /// The file does not exist or is not a regular file.
    NotAFile { path: PathBuf },

    /// The file exceeds the maximum size loaded in one go.
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error while reading the file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAFile { path } => {
                write!(f, "'{}' is not a readable file", path.display())
            }
            Self::FileTooLarge { path, size, max } => write!(
                f,
                "'{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "'{}': I/O error: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<IngestError> for LogViewError {
    fn from(e: IngestError) -> Self {
        Self::Ingest(e)
    }
}

// ---------------------------------------------------------------------------
// Font errors
// ---------------------------------------------------------------------------

/// Errors related to locating the raw view font.
#[derive(Debug)]
pub enum FontError {
    /// No installed font file matched the requested family and weight.
    NotFound { family: String, weight: u16 },

    /// The matching font file is larger than the allowed maximum.
    FileTooLarge { path: PathBuf, size: u64, max: u64 },

    /// I/O error reading the font file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { family, weight } => {
                write!(f, "No installed font matches '{family}' weight {weight}")
            }
            Self::FileTooLarge { path, size, max } => write!(
                f,
                "Font '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::Io { path, source } => {
                write!(f, "Font I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for FontError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<FontError> for LogViewError {
    fn from(e: FontError) -> Self {
        Self::Font(e)
    }
}

/// Convenience type alias for LogView results.
pub type Result<T> = std::result::Result<T, LogViewError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_ingest_error_chain_preserves_io_source() {
        let err: LogViewError = IngestError::Io {
            path: PathBuf::from("app.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .into();
        assert!(err.to_string().starts_with("Ingest error: 'app.log'"));
        let inner = err.source().expect("ingest source");
        assert!(inner.source().is_some(), "io error should be chained");
    }

    #[test]
    fn test_font_not_found_message_names_family() {
        let err = FontError::NotFound {
            family: "Fira Code".to_string(),
            weight: 300,
        };
        assert_eq!(
            err.to_string(),
            "No installed font matches 'Fira Code' weight 300"
        );
        assert!(err.source().is_none());
    }
}
