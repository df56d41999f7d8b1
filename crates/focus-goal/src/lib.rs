//! # focus-goal
//!
//! Goal model and goal-creation helpers for session focus tracking.
//!
//! A [`Goal`] is one tracked unit of intent at a given granularity
//! (epic → issue → task → subtask). Goals are built by the helpers in
//! [`events`] from upstream task/issue events or manual commands, and then
//! handed to the session stack engine in `focus-session`.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalKind`] / [`GoalSource`] — the immutable goal value
//! - [`GoalFields`] — the fixed 11-slot descriptive record, never empty
//! - [`extract_fields`] — best-effort `LABEL: value` parsing of free text
//! - [`TaskUpdate`] / [`IssueDetected`] — upstream event shapes and their
//!   conversion into goals

pub mod error;
pub mod events;
pub mod extract;
pub mod fields;
pub mod goal;

pub use error::GoalError;
pub use events::{manual_goal, spec_change_goal, IssueDetected, TaskUpdate};
pub use extract::{extract_fields, extract_labels, first_line_headline, Extraction};
pub use fields::GoalFields;
pub use goal::{Goal, GoalKind, GoalSource};
