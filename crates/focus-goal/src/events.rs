// events.rs — Upstream event shapes and goal-creation helpers.
//
// Collaborators outside this crate (task-tracker hooks, issue detectors,
// manual commands) describe work in their own terms. The helpers here turn
// each shape into a Goal with extracted fields and a deterministic id, so
// that the same event delivered twice produces the same goal id and the
// stack engine's duplicate guard absorbs the repeat.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::GoalError;
use crate::extract::extract_labels;
use crate::fields::GoalFields;
use crate::goal::{Goal, GoalKind, GoalSource};

/// A task-tracking update: a task was created or moved to in-progress.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskUpdate {
    pub id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TaskUpdate {
    pub fn new(id: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            subject: subject.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a `task` goal for this update.
    pub fn to_goal(&self, pushed_by: &str) -> Result<Goal, GoalError> {
        self.build(GoalKind::Task, pushed_by)
    }

    /// Build a `subtask` goal for this update.
    pub fn to_subtask_goal(&self, pushed_by: &str) -> Result<Goal, GoalError> {
        self.build(GoalKind::Subtask, pushed_by)
    }

    fn build(&self, kind: GoalKind, pushed_by: &str) -> Result<Goal, GoalError> {
        let id = require("task", "id", &self.id)?;
        let subject = require("task", "subject", &self.subject)?;
        Ok(Goal::new(
            format!("task-{}", id),
            kind,
            subject,
            fields_for(subject, self.description.as_deref()),
            GoalSource::task(id),
            pushed_by,
        ))
    }
}

/// An issue-detection event: the agent started working on an external issue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueDetected {
    /// Issue reference as written upstream (e.g., "#7" or "7").
    pub reference: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl IssueDetected {
    pub fn new(reference: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            title: title.into(),
            body: None,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Normalized reference: always `#<number>`.
    pub fn normalized_reference(&self) -> String {
        format!("#{}", self.reference.trim().trim_start_matches('#'))
    }

    /// Build an `issue` goal for this event.
    pub fn to_goal(&self, pushed_by: &str) -> Result<Goal, GoalError> {
        let bare = self.reference.trim().trim_start_matches('#');
        if bare.is_empty() {
            return Err(GoalError::InvalidEvent {
                event: "issue",
                reason: "empty reference".to_string(),
            });
        }
        let title = require("issue", "title", &self.title)?;
        Ok(Goal::new(
            format!("issue-{}", bare),
            GoalKind::Issue,
            title,
            fields_for(title, self.body.as_deref()),
            GoalSource::issue(self.normalized_reference()),
            pushed_by,
        ))
    }
}

/// Build a goal from a manual command. Manual goals get a fresh random id.
pub fn manual_goal(
    kind: GoalKind,
    summary: &str,
    details: Option<&str>,
    pushed_by: &str,
) -> Result<Goal, GoalError> {
    let summary = require("manual", "summary", summary)?;
    Ok(Goal::new(
        format!("manual-{}", Uuid::new_v4()),
        kind,
        summary,
        fields_for(summary, details),
        GoalSource::manual(),
        pushed_by,
    ))
}

/// Build an epic for a spec change. The id is derived from the spec id.
pub fn spec_change_goal(
    spec_id: &str,
    summary: &str,
    details: Option<&str>,
    pushed_by: &str,
) -> Result<Goal, GoalError> {
    let spec_id = require("spec-change", "spec id", spec_id)?;
    let summary = require("spec-change", "summary", summary)?;
    Ok(Goal::new(
        format!("spec-{}", spec_id),
        GoalKind::Epic,
        summary,
        fields_for(summary, details),
        GoalSource::spec_change(spec_id),
        pushed_by,
    ))
}

/// Extract fields from the details when present, else from the summary.
/// Without an explicit `WHAT` line the goal's own summary is the headline.
fn fields_for(summary: &str, details: Option<&str>) -> GoalFields {
    let text = details.filter(|d| !d.trim().is_empty()).unwrap_or(summary);
    let extraction = extract_labels(text);
    let has_what = extraction.has("WHAT");
    let mut fields = extraction.fields;
    if !has_what {
        fields.what = summary.to_string();
    }
    fields
}

fn require<'a>(event: &'static str, what: &str, value: &'a str) -> Result<&'a str, GoalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GoalError::InvalidEvent {
            event,
            reason: format!("empty {}", what),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::DEFAULT_WHO;

    #[test]
    fn task_update_builds_deterministic_task_goal() {
        let update = TaskUpdate::new("3", "Round to 2 decimals");
        let a = update.to_goal("task-hook").unwrap();
        let b = update.to_goal("task-hook").unwrap();

        assert_eq!(a.id, "task-3");
        assert_eq!(a.id, b.id);
        assert_eq!(a.kind, GoalKind::Task);
        assert_eq!(a.summary, "Round to 2 decimals");
        assert_eq!(a.fields.what, "Round to 2 decimals");
        assert_eq!(a.source.task_ref.as_deref(), Some("3"));
        assert_eq!(a.pushed_by, "task-hook");
    }

    #[test]
    fn task_description_feeds_extraction() {
        let update = TaskUpdate::new("9", "Refactor parser")
            .with_description("WHO: Dana\nWHY: error messages are unreadable");
        let goal = update.to_subtask_goal("task-hook").unwrap();
        assert_eq!(goal.kind, GoalKind::Subtask);
        assert_eq!(goal.fields.who, "Dana");
        assert_eq!(goal.fields.why, "error messages are unreadable");
        assert_eq!(goal.fields.what, "Refactor parser");
    }

    #[test]
    fn blank_description_falls_back_to_subject() {
        let update = TaskUpdate::new("1", "Write docs").with_description("   ");
        let goal = update.to_goal("t").unwrap();
        assert_eq!(goal.fields.what, "Write docs");
        assert_eq!(goal.fields.who, DEFAULT_WHO);
    }

    #[test]
    fn empty_task_subject_is_rejected() {
        let result = TaskUpdate::new("1", "  ").to_goal("t");
        assert!(matches!(
            result,
            Err(GoalError::InvalidEvent { event: "task", .. })
        ));
    }

    #[test]
    fn issue_reference_is_normalized() {
        let with_hash = IssueDetected::new("#7", "Fix invoice rounding")
            .to_goal("issue-detector")
            .unwrap();
        let bare = IssueDetected::new("7", "Fix invoice rounding")
            .to_goal("issue-detector")
            .unwrap();

        assert_eq!(with_hash.id, "issue-7");
        assert_eq!(with_hash.id, bare.id);
        assert_eq!(with_hash.kind, GoalKind::Issue);
        assert_eq!(with_hash.source.issue_ref.as_deref(), Some("#7"));
        assert_eq!(bare.source.issue_ref.as_deref(), Some("#7"));
    }

    #[test]
    fn labeled_issue_body_without_what_uses_title() {
        let goal = IssueDetected::new("#12", "Fix invoice rounding")
            .with_body("Seen in the nightly report.\nWHY: totals drift\nWHO: billing team")
            .to_goal("issue-detector")
            .unwrap();
        assert_eq!(goal.fields.what, "Fix invoice rounding");
        assert_eq!(goal.fields.why, "totals drift");
        assert_eq!(goal.fields.who, "billing team");
    }

    #[test]
    fn issue_without_reference_is_rejected() {
        let result = IssueDetected::new("#", "Something").to_goal("x");
        assert!(matches!(
            result,
            Err(GoalError::InvalidEvent { event: "issue", .. })
        ));
    }

    #[test]
    fn manual_goals_get_unique_ids() {
        let a = manual_goal(GoalKind::Epic, "Migrate billing", None, "manual").unwrap();
        let b = manual_goal(GoalKind::Epic, "Migrate billing", None, "manual").unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("manual-"));
        assert!(a.source.manual);
    }

    #[test]
    fn spec_change_goal_is_an_epic() {
        let goal = spec_change_goal("auth-v2", "Adopt new auth flow", None, "spec-hook").unwrap();
        assert_eq!(goal.id, "spec-auth-v2");
        assert_eq!(goal.kind, GoalKind::Epic);
        assert_eq!(goal.source.spec_ref.as_deref(), Some("auth-v2"));
    }

    #[test]
    fn task_update_deserializes_without_description() {
        let update: TaskUpdate =
            serde_json::from_str(r#"{"id":"4","subject":"Add CI"}"#).unwrap();
        assert_eq!(update, TaskUpdate::new("4", "Add CI"));
    }
}
