// global.rs — The cross-session focus pointer.
//
// One shared document exposes "the" currently active top-level goal to tools
// outside any single session. Only epic and issue goals reach it.
//
// Write arbitration (advisory, not a lock):
//   - content is always overwritten by the latest publish
//   - owner_scope changes only if unset, or if the writer's directory is
//     the scope or nested inside it
//
// A writer from an unrelated project can therefore replace the displayed
// content for a while, but never takes over scope ownership.
//
// The arbitration rule lives in `GlobalPointer::apply`, a pure function of
// (old record, write). `GlobalSync` wraps it in load → apply → save. Under
// true concurrency a lost update is possible; the record is display state.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use focus_goal::{Goal, GoalFields};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::stack::BoundedHistory;

/// Maximum entries kept in the pointer's cleared-content history.
pub const GLOBAL_HISTORY_LIMIT: usize = 10;

/// The goal currently displayed by the pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointerContent {
    pub summary: String,
    pub fields: GoalFields,
    pub goal_id: String,
    pub session_id: String,
    pub updated_at: DateTime<Utc>,
}

/// A summary that was cleared from the pointer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClearedContent {
    pub summary: String,
    pub cleared_at: DateTime<Utc>,
}

/// The shared pointer document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GlobalPointer {
    #[serde(default)]
    pub content: Option<PointerContent>,

    /// Project directory that owns the pointer.
    #[serde(default)]
    pub owner_scope: Option<PathBuf>,

    /// Issue references ever published. Append-only, no duplicates.
    #[serde(default)]
    pub linked_issues: Vec<String>,

    /// Most recently published spec-change reference.
    #[serde(default)]
    pub linked_spec: Option<String>,

    #[serde(default)]
    pub history: BoundedHistory<ClearedContent, GLOBAL_HISTORY_LIMIT>,
}

/// A top-level goal being published to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct Publication {
    pub goal_id: String,
    pub summary: String,
    pub fields: GoalFields,
    pub session_id: String,
    /// Working directory of the writing session.
    pub writer_dir: PathBuf,
    pub issue_ref: Option<String>,
    pub spec_ref: Option<String>,
    pub at: DateTime<Utc>,
}

impl Publication {
    pub fn from_goal(goal: &Goal, writer_dir: &Path, session_id: &str) -> Self {
        Self {
            goal_id: goal.id.clone(),
            summary: goal.summary.clone(),
            fields: goal.fields.clone(),
            session_id: session_id.to_string(),
            writer_dir: writer_dir.to_path_buf(),
            issue_ref: goal.source.issue_ref.clone(),
            spec_ref: goal.source.spec_ref.clone(),
            at: Utc::now(),
        }
    }
}

/// One candidate change to the pointer.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncWrite {
    Publish(Publication),
    Clear { at: DateTime<Utc> },
}

impl GlobalPointer {
    /// Whether a writer in `writer_dir` may set the owner scope.
    ///
    /// An empty `writer_dir` (unknown working directory) is never admitted:
    /// every path starts with the empty path, so it would act as a wildcard.
    pub fn scope_admits(&self, writer_dir: &Path) -> bool {
        if writer_dir.as_os_str().is_empty() {
            return false;
        }
        match &self.owner_scope {
            None => true,
            Some(scope) => writer_dir.starts_with(scope),
        }
    }

    /// Compute the record that results from applying `write`.
    pub fn apply(&self, write: &SyncWrite) -> GlobalPointer {
        let mut next = self.clone();
        match write {
            SyncWrite::Publish(publication) => {
                next.content = Some(PointerContent {
                    summary: publication.summary.clone(),
                    fields: publication.fields.clone(),
                    goal_id: publication.goal_id.clone(),
                    session_id: publication.session_id.clone(),
                    updated_at: publication.at,
                });
                if self.scope_admits(&publication.writer_dir) {
                    next.owner_scope = Some(publication.writer_dir.clone());
                }
                if let Some(issue) = &publication.issue_ref {
                    if !next.linked_issues.contains(issue) {
                        next.linked_issues.push(issue.clone());
                    }
                }
                if let Some(spec) = &publication.spec_ref {
                    next.linked_spec = Some(spec.clone());
                }
            }
            SyncWrite::Clear { at } => {
                if let Some(content) = next.content.take() {
                    next.history.record(ClearedContent {
                        summary: content.summary,
                        cleared_at: *at,
                    });
                }
            }
        }
        next
    }
}

/// File-backed adapter around [`GlobalPointer::apply`].
pub struct GlobalSync {
    path: PathBuf,
}

impl GlobalSync {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current pointer, or an empty one if absent or unreadable.
    pub fn load(&self) -> GlobalPointer {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return GlobalPointer::default();
            }
            Err(e) => {
                tracing::warn!("discarding unreadable focus pointer {}: {}", self.path.display(), e);
                return GlobalPointer::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!("discarding malformed focus pointer {}: {}", self.path.display(), e);
            GlobalPointer::default()
        })
    }

    /// Overwrite the pointer document.
    pub fn save(&self, pointer: &GlobalPointer) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
        }
        let json = serde_json::to_string_pretty(pointer)?;
        fs::write(&self.path, json).map_err(|e| SessionError::io(&self.path, e))?;
        Ok(())
    }

    /// Load, apply `write`, save. Returns the new record.
    pub fn sync(&self, write: &SyncWrite) -> Result<GlobalPointer, SessionError> {
        let old = self.load();
        let next = old.apply(write);
        if next.owner_scope != old.owner_scope {
            tracing::info!(
                scope = ?next.owner_scope,
                "focus pointer scope changed"
            );
        }
        if next != old {
            self.save(&next)?;
        }
        Ok(next)
    }

    /// Publish a top-level goal written from `writer_dir`.
    pub fn publish(
        &self,
        goal: &Goal,
        writer_dir: &Path,
        session_id: &str,
    ) -> Result<GlobalPointer, SessionError> {
        self.sync(&SyncWrite::Publish(Publication::from_goal(
            goal, writer_dir, session_id,
        )))
    }

    /// Clear the displayed content, keeping scope and linked references.
    pub fn clear(&self) -> Result<GlobalPointer, SessionError> {
        self.sync(&SyncWrite::Clear { at: Utc::now() })
    }
}
