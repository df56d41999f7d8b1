// error.rs — Error types for goal construction.

use thiserror::Error;

/// Errors that can occur while building goals.
#[derive(Debug, Error)]
pub enum GoalError {
    /// A goal kind string did not name one of epic/issue/task/subtask.
    #[error("unknown goal kind: {0} (expected epic, issue, task, or subtask)")]
    UnknownKind(String),

    /// An upstream event was missing a required identifier or headline.
    #[error("invalid {event} event: {reason}")]
    InvalidEvent { event: &'static str, reason: String },
}
