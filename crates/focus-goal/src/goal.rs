// goal.rs — Goal: one tracked unit of intent.
//
// Goals nest by granularity:
//   epic → issue → task → subtask
//
// Only epics and issues are "top-level": they are the goals mirrored into
// the cross-session focus pointer. Tasks and subtasks stay private to the
// session that pushed them.
//
// A Goal is a value. Once built it is never edited; popping a goal moves it
// into the session history as-is.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::fields::GoalFields;

/// Granularity of a goal, broadest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Epic,
    Issue,
    Task,
    Subtask,
}

impl GoalKind {
    /// Epics and issues are mirrored into the global focus pointer.
    pub fn is_top_level(self) -> bool {
        matches!(self, GoalKind::Epic | GoalKind::Issue)
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalKind::Epic => write!(f, "epic"),
            GoalKind::Issue => write!(f, "issue"),
            GoalKind::Task => write!(f, "task"),
            GoalKind::Subtask => write!(f, "subtask"),
        }
    }
}

impl FromStr for GoalKind {
    type Err = GoalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "epic" => Ok(GoalKind::Epic),
            "issue" => Ok(GoalKind::Issue),
            "task" => Ok(GoalKind::Task),
            "subtask" | "sub-task" | "sub_task" => Ok(GoalKind::Subtask),
            other => Err(GoalError::UnknownKind(other.to_string())),
        }
    }
}

/// Where a goal came from.
///
/// At most one reference is normally set. Absent references are omitted
/// from JSON so older documents stay readable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GoalSource {
    /// External issue reference (e.g., "#7").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_ref: Option<String>,

    /// External task-tracker id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_ref: Option<String>,

    /// Spec-change identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_ref: Option<String>,

    /// Set when a human or agent pushed the goal by hand.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub manual: bool,
}

impl GoalSource {
    pub fn issue(reference: impl Into<String>) -> Self {
        Self {
            issue_ref: Some(reference.into()),
            ..Self::default()
        }
    }

    pub fn task(task_id: impl Into<String>) -> Self {
        Self {
            task_ref: Some(task_id.into()),
            ..Self::default()
        }
    }

    pub fn spec_change(spec_id: impl Into<String>) -> Self {
        Self {
            spec_ref: Some(spec_id.into()),
            ..Self::default()
        }
    }

    pub fn manual() -> Self {
        Self {
            manual: true,
            ..Self::default()
        }
    }
}

/// One tracked intent in a session's goal stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Stable identifier. Event-derived goals use deterministic ids
    /// (`task-<id>`, `issue-<ref>`) so redelivered events collapse.
    pub id: String,

    /// Granularity of this goal.
    pub kind: GoalKind,

    /// One-line headline (e.g., "Fix invoice rounding").
    pub summary: String,

    /// Descriptive fields; every slot is non-empty.
    pub fields: GoalFields,

    /// Provenance.
    #[serde(default)]
    pub source: GoalSource,

    /// When the goal was created for pushing.
    pub pushed_at: DateTime<Utc>,

    /// Who pushed it (e.g., "task-hook", "issue-detector", "manual").
    pub pushed_by: String,
}

impl Goal {
    /// Build a goal stamped with the current time.
    pub fn new(
        id: impl Into<String>,
        kind: GoalKind,
        summary: impl Into<String>,
        fields: GoalFields,
        source: GoalSource,
        pushed_by: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            summary: summary.into(),
            fields,
            source,
            pushed_at: Utc::now(),
            pushed_by: pushed_by.into(),
        }
    }

    /// Shorthand for `self.kind.is_top_level()`.
    pub fn is_top_level(&self) -> bool {
        self.kind.is_top_level()
    }
}
