// event.rs — Event subcommands: turn upstream task/issue events into goals.

use clap::Subcommand;
use focus_goal::{IssueDetected, TaskUpdate};

use super::{push_and_report, FocusContext};

#[derive(Subcommand)]
pub enum EventCommands {
    /// A task was created or moved to in-progress.
    Task {
        /// Task id from the tracker (e.g., "3").
        id: String,
        /// Task subject line.
        subject: String,
        /// Task description; labeled lines fill the descriptive fields.
        #[arg(long)]
        description: Option<String>,
        /// Push as a subtask instead of a task.
        #[arg(long)]
        subtask: bool,
        #[arg(long, default_value = "task-hook")]
        by: String,
    },
    /// Work started on an external issue.
    Issue {
        /// Issue reference (e.g., "#7" or "7").
        reference: String,
        /// Issue title.
        title: String,
        /// Issue body; labeled lines fill the descriptive fields.
        #[arg(long)]
        body: Option<String>,
        #[arg(long, default_value = "issue-detector")]
        by: String,
    },
}

pub fn execute(cmd: &EventCommands, ctx: &FocusContext) -> anyhow::Result<()> {
    match cmd {
        EventCommands::Task {
            id,
            subject,
            description,
            subtask,
            by,
        } => {
            let mut update = TaskUpdate::new(id, subject);
            if let Some(description) = description {
                update = update.with_description(description);
            }
            let goal = if *subtask {
                update.to_subtask_goal(by)?
            } else {
                update.to_goal(by)?
            };
            push_and_report(ctx, goal)
        }
        EventCommands::Issue {
            reference,
            title,
            body,
            by,
        } => {
            let mut event = IssueDetected::new(reference, title);
            if let Some(body) = body {
                event = event.with_body(body);
            }
            push_and_report(ctx, event.to_goal(by)?)
        }
    }
}
