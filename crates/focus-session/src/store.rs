// store.rs — SessionStore: persistence for per-session goal stacks.
//
// Each session is stored as `<sessions_dir>/<session_id>/goal_stack.json`.
// The per-session directory gives the janitor a single unit to archive.
//
// A session has exactly one active writer at a time, so saves simply
// overwrite the whole document. Loads are lenient: a missing or unparseable
// document yields a fresh empty stack rather than an error.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::config::{ARCHIVE_DIR_NAME, SENTINEL_FILE_NAME};
use crate::error::SessionError;
use crate::session_id::sanitize_session_id;
use crate::stack::SessionStack;

/// File name of the stack document inside a session directory.
pub const STACK_FILE_NAME: &str = "goal_stack.json";

/// Persistent store for SessionStack records.
pub struct SessionStore {
    sessions_dir: PathBuf,
    working_dir: PathBuf,
}

impl SessionStore {
    /// Create a store backed by `sessions_dir`, creating it if needed.
    /// The process's current directory is used for drift correction.
    pub fn new(sessions_dir: impl AsRef<Path>) -> Result<Self, SessionError> {
        let sessions_dir = sessions_dir.as_ref().to_path_buf();
        fs::create_dir_all(&sessions_dir).map_err(|e| SessionError::io(&sessions_dir, e))?;
        let working_dir = std::env::current_dir().unwrap_or_else(|e| {
            tracing::warn!("cannot determine working directory: {}", e);
            PathBuf::new()
        });
        Ok(Self {
            sessions_dir,
            working_dir,
        })
    }

    /// Override the working directory this store reports for its process.
    pub fn with_working_dir(mut self, working_dir: impl Into<PathBuf>) -> Self {
        self.working_dir = working_dir.into();
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn sessions_dir(&self) -> &Path {
        &self.sessions_dir
    }

    /// Load a session's stack, or a fresh one if absent or unreadable.
    ///
    /// If the stored working directory differs from this process's, the
    /// record is updated and re-saved immediately so the session follows its
    /// owner across directories.
    pub fn load(&self, session_id: &str) -> SessionStack {
        let mut stack = self.peek(session_id);
        if stack.working_directory != self.working_dir {
            tracing::debug!(
                session = session_id,
                from = %stack.working_directory.display(),
                to = %self.working_dir.display(),
                "session working directory drifted"
            );
            stack.working_directory = self.working_dir.clone();
            if let Err(e) = self.save(&mut stack) {
                tracing::warn!("failed to persist drift correction: {}", e);
            }
        }
        stack
    }

    /// Read a session's stack without drift correction or any write.
    ///
    /// For inspecting sessions this process does not own (listings, reports).
    pub fn peek(&self, session_id: &str) -> SessionStack {
        let path = self.stack_file(session_id);
        match self.read(&path) {
            Some(mut stack) => {
                stack.session_id = session_id.to_string();
                stack
            }
            None => SessionStack::new(session_id, self.working_dir.clone()),
        }
    }

    /// Overwrite the session document, refreshing `last_modified`.
    pub fn save(&self, stack: &mut SessionStack) -> Result<(), SessionError> {
        stack.last_modified = Utc::now();
        let dir = self.session_dir(&stack.session_id);
        fs::create_dir_all(&dir).map_err(|e| SessionError::io(&dir, e))?;

        let path = dir.join(STACK_FILE_NAME);
        let json = serde_json::to_string_pretty(stack)?;
        fs::write(&path, json).map_err(|e| SessionError::io(&path, e))?;
        Ok(())
    }

    /// Session ids that currently have a directory on disk.
    pub fn list(&self) -> Result<Vec<String>, SessionError> {
        let entries =
            fs::read_dir(&self.sessions_dir).map_err(|e| SessionError::io(&self.sessions_dir, e))?;

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| SessionError::io(&self.sessions_dir, e))?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name != ARCHIVE_DIR_NAME {
                ids.push(name);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Directory holding one session's state.
    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        let mut name = sanitize_session_id(session_id);
        if name == ARCHIVE_DIR_NAME || name == SENTINEL_FILE_NAME {
            name.push('_');
        }
        self.sessions_dir.join(name)
    }

    fn stack_file(&self, session_id: &str) -> PathBuf {
        self.session_dir(session_id).join(STACK_FILE_NAME)
    }

    fn read(&self, path: &Path) -> Option<SessionStack> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("discarding unreadable session stack {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&json) {
            Ok(stack) => Some(stack),
            Err(e) => {
                tracing::warn!("discarding malformed session stack {}: {}", path.display(), e);
                None
            }
        }
    }
}
