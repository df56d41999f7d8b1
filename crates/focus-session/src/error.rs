// error.rs — Error types for session persistence and housekeeping.

use thiserror::Error;

/// Errors that can occur while persisting session or pointer state.
///
/// Reads never produce these: unreadable documents are replaced by fresh
/// empty state. Only writes, directory creation, and config loading fail.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize session or pointer data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The config file exists but is not valid TOML for FocusSettings.
    #[error("invalid config at {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    /// No focus home could be determined (no FOCUS_HOME, no home directory).
    #[error("cannot locate a home directory; set FOCUS_HOME")]
    NoHomeDir,
}

impl SessionError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        SessionError::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
