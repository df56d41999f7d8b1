// goal.rs — Goal subcommands: push, spec, pop, current, show, history.

use clap::Subcommand;
use focus_goal::{manual_goal, spec_change_goal, GoalKind};

use super::{push_and_report, truncate, FocusContext};

#[derive(Subcommand)]
pub enum GoalCommands {
    /// Push a goal by hand and make it the current focus.
    Push {
        /// Granularity: epic, issue, task, or subtask.
        kind: GoalKind,
        /// One-line summary (e.g., "Migrate billing").
        summary: String,
        /// Free text; `LABEL: value` lines fill the descriptive fields.
        #[arg(long)]
        details: Option<String>,
        /// Who is pushing the goal.
        #[arg(long, default_value = "manual")]
        by: String,
    },
    /// Push an epic for a spec change.
    Spec {
        /// Spec-change identifier.
        spec_id: String,
        /// One-line summary.
        summary: String,
        #[arg(long)]
        details: Option<String>,
        #[arg(long, default_value = "spec-change")]
        by: String,
    },
    /// Complete the current focus.
    Pop {
        /// Only pop if this id is the current focus.
        #[arg(long)]
        id: Option<String>,
        /// Record the goal as not achieved.
        #[arg(long)]
        failed: bool,
        #[arg(long, default_value = "manual")]
        by: String,
    },
    /// Print the current focus.
    Current {
        /// Print the goal as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the full hierarchy and the current focus's fields.
    Show,
    /// Print recently completed goals.
    History,
}

pub fn execute(cmd: &GoalCommands, ctx: &FocusContext) -> anyhow::Result<()> {
    match cmd {
        GoalCommands::Push {
            kind,
            summary,
            details,
            by,
        } => push_and_report(ctx, manual_goal(*kind, summary, details.as_deref(), by)?),
        GoalCommands::Spec {
            spec_id,
            summary,
            details,
            by,
        } => push_and_report(
            ctx,
            spec_change_goal(spec_id, summary, details.as_deref(), by)?,
        ),
        GoalCommands::Pop { id, failed, by } => pop_goal(ctx, id.as_deref(), !*failed, by),
        GoalCommands::Current { json } => show_current(ctx, *json),
        GoalCommands::Show => {
            println!("{}", ctx.tracker()?.format_hierarchy(&ctx.session_id));
            Ok(())
        }
        GoalCommands::History => show_history(ctx),
    }
}

fn pop_goal(
    ctx: &FocusContext,
    id: Option<&str>,
    succeeded: bool,
    by: &str,
) -> anyhow::Result<()> {
    let tracker = ctx.tracker()?;
    let popped = match id {
        Some(id) => tracker.pop_by_id(&ctx.session_id, id, succeeded, by)?,
        None => tracker.pop(&ctx.session_id, succeeded, by)?,
    };

    match (popped, id) {
        (Some(goal), _) => {
            let verb = if succeeded { "Completed" } else { "Abandoned" };
            println!("{} {} {}: {}", verb, goal.kind, goal.id, goal.summary);
        }
        (None, Some(id)) => println!("{} is not the current focus; nothing popped.", id),
        (None, None) => println!("No active goal; nothing popped."),
    }
    Ok(())
}

fn show_current(ctx: &FocusContext, json: bool) -> anyhow::Result<()> {
    let current = ctx.tracker()?.current_goal(&ctx.session_id);
    match (current, json) {
        (Some(goal), true) => println!("{}", serde_json::to_string_pretty(&goal)?),
        (Some(goal), false) => {
            println!("Goal:    {}", goal.id);
            println!("Kind:    {}", goal.kind);
            println!("Summary: {}", goal.summary);
            println!("Pushed:  {} by {}", goal.pushed_at.to_rfc3339(), goal.pushed_by);
        }
        (None, true) => println!("null"),
        (None, false) => println!("No active goal for this session."),
    }
    Ok(())
}

fn show_history(ctx: &FocusContext) -> anyhow::Result<()> {
    let history = ctx.tracker()?.history(&ctx.session_id);
    if history.is_empty() {
        println!("No completed goals in this session.");
        return Ok(());
    }

    println!(
        "{:<22} {:<8} {:<7} {:<40} {:<12}",
        "POPPED", "KIND", "RESULT", "SUMMARY", "BY"
    );
    println!("{}", "-".repeat(92));
    for entry in history.iter().rev() {
        println!(
            "{:<22} {:<8} {:<7} {:<40} {:<12}",
            entry.popped_at.format("%Y-%m-%d %H:%M:%S"),
            entry.goal.kind.to_string(),
            if entry.succeeded { "done" } else { "failed" },
            truncate(&entry.goal.summary, 38),
            entry.popped_by,
        );
    }
    println!("\n{} goal(s) in history.", history.len());
    Ok(())
}
