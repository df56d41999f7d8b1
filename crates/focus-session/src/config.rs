// config.rs — Focus configuration.
//
// FocusConfig determines where session stacks, the shared pointer, and the
// janitor's bookkeeping live. `for_home()` derives the standard layout
// under a single focus home directory:
//
//   <home>/
//     config.toml          optional tunables (FocusSettings)
//     global_goal.json     shared cross-session pointer
//     sessions/
//       <session-id>/goal_stack.json
//       _archive/          stale sessions moved here by the janitor
//       .last_cleanup      janitor throttle sentinel

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Environment variable overriding the focus home directory.
pub const HOME_ENV: &str = "FOCUS_HOME";

/// Directory name under the user's home when FOCUS_HOME is unset.
pub const DEFAULT_HOME_DIR_NAME: &str = ".focus";

pub const ARCHIVE_DIR_NAME: &str = "_archive";
pub const SENTINEL_FILE_NAME: &str = ".last_cleanup";

/// Paths and tunables for one focus home.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Root of all focus state.
    pub home: PathBuf,

    /// One subdirectory per session.
    pub sessions_dir: PathBuf,

    /// Where the janitor moves stale session directories.
    pub archive_dir: PathBuf,

    /// The shared cross-session pointer document.
    pub global_pointer: PathBuf,

    /// Janitor throttle sentinel.
    pub cleanup_sentinel: PathBuf,

    /// Optional TOML settings file.
    pub settings_file: PathBuf,

    /// Janitor tunables (from settings_file, or defaults).
    #[serde(default)]
    pub janitor: JanitorConfig,
}

impl FocusConfig {
    /// Standard layout under `home`, with default tunables.
    pub fn for_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        let sessions_dir = home.join("sessions");
        Self {
            archive_dir: sessions_dir.join(ARCHIVE_DIR_NAME),
            cleanup_sentinel: sessions_dir.join(SENTINEL_FILE_NAME),
            global_pointer: home.join("global_goal.json"),
            settings_file: home.join("config.toml"),
            sessions_dir,
            janitor: JanitorConfig::default(),
            home,
        }
    }

    /// Resolve the focus home and apply any settings file found there.
    ///
    /// Priority: `explicit` → `$FOCUS_HOME` → `<user home>/.focus`.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, SessionError> {
        let home = match explicit {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
                Some(value) => PathBuf::from(value),
                None => dirs::home_dir()
                    .ok_or(SessionError::NoHomeDir)?
                    .join(DEFAULT_HOME_DIR_NAME),
            },
        };
        let mut config = Self::for_home(home);
        config.janitor = FocusSettings::load_or_default(&config.settings_file).janitor;
        Ok(config)
    }
}

/// Janitor tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JanitorConfig {
    /// Sessions untouched for longer than this are archived.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,

    /// Minimum hours between two cleanup scans.
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            max_age_days: default_max_age_days(),
            interval_hours: default_interval_hours(),
        }
    }
}

fn default_max_age_days() -> u64 {
    7
}

fn default_interval_hours() -> u64 {
    24
}

/// Contents of `<home>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocusSettings {
    #[serde(default)]
    pub janitor: JanitorConfig,
}

impl FocusSettings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
        toml::from_str(&content).map_err(|e| SessionError::InvalidConfig {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Load settings, returning defaults if the file is absent or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("ignoring focus settings: {}", e);
            Self::default()
        })
    }
}
