pub mod event;
pub mod global;
pub mod goal;
pub mod session;

use focus_goal::Goal;
use focus_session::{FocusConfig, GoalTracker};

/// Resolved configuration and session for one invocation.
pub struct FocusContext {
    pub config: FocusConfig,
    pub session_id: String,
}

impl FocusContext {
    pub fn tracker(&self) -> anyhow::Result<GoalTracker> {
        Ok(GoalTracker::from_config(&self.config)?)
    }
}

/// Push `goal` and report what happened.
pub(crate) fn push_and_report(ctx: &FocusContext, goal: Goal) -> anyhow::Result<()> {
    let tracker = ctx.tracker()?;
    let id = goal.id.clone();
    let kind = goal.kind;
    let summary = goal.summary.clone();
    match tracker.push(&ctx.session_id, goal)? {
        focus_session::PushOutcome::Pushed => {
            println!("Pushed {} {}: {}", kind, id, summary);
        }
        focus_session::PushOutcome::Duplicate => {
            println!("Already tracking {}; stack unchanged.", id);
        }
    }
    Ok(())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}
