// tracker.rs — GoalTracker: stack operations with persistence and sync.
//
// Every operation is load → compute → save for one session, followed by a
// pointer sync when the goal involved is top-level (epic/issue). Tasks and
// subtasks never touch the shared pointer.
//
// Pointer failures are logged and swallowed: the session stack is the
// source of truth and the pointer is display state that the next top-level
// push or pop will overwrite anyway.

use focus_goal::Goal;

use crate::config::FocusConfig;
use crate::error::SessionError;
use crate::global::GlobalSync;
use crate::render::render_hierarchy;
use crate::stack::{PoppedGoal, PushOutcome, SessionStack};
use crate::store::SessionStore;

/// The stack engine for all sessions under one focus home.
pub struct GoalTracker {
    store: SessionStore,
    global: GlobalSync,
}

impl GoalTracker {
    pub fn new(store: SessionStore, global: GlobalSync) -> Self {
        Self { store, global }
    }

    /// Tracker over the standard layout of `config`.
    pub fn from_config(config: &FocusConfig) -> Result<Self, SessionError> {
        Ok(Self::new(
            SessionStore::new(&config.sessions_dir)?,
            GlobalSync::new(&config.global_pointer),
        ))
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn global(&self) -> &GlobalSync {
        &self.global
    }

    /// Make `goal` the session's current focus.
    ///
    /// A goal whose id is already anywhere on the stack is ignored, which
    /// absorbs duplicate event delivery.
    pub fn push(&self, session_id: &str, goal: Goal) -> Result<PushOutcome, SessionError> {
        let mut stack = self.store.load(session_id);
        let top_level = goal.is_top_level().then(|| goal.clone());

        let outcome = stack.push(goal);
        if outcome == PushOutcome::Duplicate {
            tracing::debug!(session = session_id, "duplicate goal push ignored");
            return Ok(outcome);
        }
        self.store.save(&mut stack)?;
        tracing::debug!(session = session_id, depth = stack.stack.len(), "goal pushed");

        if let Some(goal) = top_level {
            if let Err(e) = self
                .global
                .publish(&goal, self.store.working_dir(), session_id)
            {
                tracing::warn!("failed to publish goal {} to focus pointer: {}", goal.id, e);
            }
        }
        Ok(outcome)
    }

    /// Pop the current focus into history. `None` on an empty stack.
    pub fn pop(
        &self,
        session_id: &str,
        succeeded: bool,
        popped_by: &str,
    ) -> Result<Option<Goal>, SessionError> {
        let mut stack = self.store.load(session_id);
        let Some(goal) = stack.pop(succeeded, popped_by) else {
            return Ok(None);
        };
        self.finish_pop(session_id, &mut stack, goal)
    }

    /// Pop only if `id` is the current focus; otherwise `None`, unchanged.
    pub fn pop_by_id(
        &self,
        session_id: &str,
        id: &str,
        succeeded: bool,
        popped_by: &str,
    ) -> Result<Option<Goal>, SessionError> {
        let mut stack = self.store.load(session_id);
        let Some(goal) = stack.pop_by_id(id, succeeded, popped_by) else {
            tracing::debug!(session = session_id, id, "pop by id skipped: not the current focus");
            return Ok(None);
        };
        self.finish_pop(session_id, &mut stack, goal)
    }

    fn finish_pop(
        &self,
        session_id: &str,
        stack: &mut SessionStack,
        goal: Goal,
    ) -> Result<Option<Goal>, SessionError> {
        self.store.save(stack)?;
        tracing::debug!(session = session_id, depth = stack.stack.len(), "goal popped");

        if goal.is_top_level() {
            if let Err(e) = self.global.clear() {
                tracing::warn!("failed to clear focus pointer after {}: {}", goal.id, e);
            }
        }
        Ok(Some(goal))
    }

    /// The session's current focus.
    pub fn current_goal(&self, session_id: &str) -> Option<Goal> {
        self.store.load(session_id).stack.focus().cloned()
    }

    /// Root epic first, current focus last.
    pub fn hierarchy(&self, session_id: &str) -> Vec<Goal> {
        self.store.load(session_id).stack.to_root_first_order()
    }

    /// Popped goals, oldest first.
    pub fn history(&self, session_id: &str) -> Vec<PoppedGoal> {
        self.store.load(session_id).history.entries().to_vec()
    }

    /// Indented tree plus the current focus's fields.
    pub fn format_hierarchy(&self, session_id: &str) -> String {
        render_hierarchy(&self.hierarchy(session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_goal::{GoalFields, GoalKind, GoalSource, IssueDetected, TaskUpdate};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn tracker_in(dir: &TempDir, cwd: &str) -> GoalTracker {
        let config = FocusConfig::for_home(dir.path());
        GoalTracker::new(
            SessionStore::new(&config.sessions_dir)
                .unwrap()
                .with_working_dir(cwd),
            GlobalSync::new(&config.global_pointer),
        )
    }

    fn epic(id: &str, summary: &str) -> Goal {
        Goal::new(
            id,
            GoalKind::Epic,
            summary,
            GoalFields::default(),
            GoalSource::manual(),
            "test",
        )
    }

    #[test]
    fn task_goals_never_touch_the_pointer() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker_in(&dir, "/proj/a");
        let task = TaskUpdate::new("1", "Write tests").to_goal("hook").unwrap();

        tracker.push("s", task).unwrap();
        assert!(!tracker.global().path().exists());

        tracker.pop("s", true, "hook").unwrap();
        assert!(!tracker.global().path().exists());
    }

    #[test]
    fn duplicate_push_leaves_stack_unchanged() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker_in(&dir, "/proj/a");
        let issue = IssueDetected::new("#7", "Fix rounding").to_goal("det").unwrap();

        assert_eq!(tracker.push("s", issue.clone()).unwrap(), PushOutcome::Pushed);
        tracker
            .push("s", TaskUpdate::new("3", "Round").to_goal("hook").unwrap())
            .unwrap();
        let before = tracker.hierarchy("s");

        assert_eq!(tracker.push("s", issue).unwrap(), PushOutcome::Duplicate);
        assert_eq!(tracker.hierarchy("s"), before);
    }

    #[test]
    fn pop_on_empty_session_returns_none() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker_in(&dir, "/proj/a");
        assert!(tracker.pop("s", true, "x").unwrap().is_none());
        assert!(tracker.history("s").is_empty());
        assert!(!tracker.store().session_dir("s").exists());
    }

    #[test]
    fn sessions_are_isolated() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker_in(&dir, "/proj/a");
        tracker.push("one", epic("e1", "One")).unwrap();
        tracker.push("two", epic("e2", "Two")).unwrap();

        assert_eq!(tracker.current_goal("one").unwrap().id, "e1");
        assert_eq!(tracker.current_goal("two").unwrap().id, "e2");
        assert_eq!(tracker.hierarchy("one").len(), 1);
    }

    #[test]
    fn foreign_project_cannot_steal_scope() {
        let dir = TempDir::new().unwrap();
        tracker_in(&dir, "/proj/a")
            .push("a", epic("ea", "Project A"))
            .unwrap();
        let foreign = tracker_in(&dir, "/proj/b");
        foreign.push("b", epic("eb", "Project B")).unwrap();

        let pointer = foreign.global().load();
        assert_eq!(pointer.content.unwrap().summary, "Project B");
        assert_eq!(pointer.owner_scope, Some(PathBuf::from("/proj/a")));
    }

    #[test]
    fn nested_session_refreshes_scope() {
        let dir = TempDir::new().unwrap();
        tracker_in(&dir, "/proj/a")
            .push("a", epic("ea", "Project A"))
            .unwrap();
        let nested = tracker_in(&dir, "/proj/a/sub");
        nested.push("sub", epic("es", "Sub work")).unwrap();

        let pointer = nested.global().load();
        assert_eq!(pointer.owner_scope.as_deref(), Some(Path::new("/proj/a/sub")));
    }

    #[test]
    fn format_hierarchy_for_empty_session() {
        let dir = TempDir::new().unwrap();
        let tracker = tracker_in(&dir, "/proj/a");
        assert_eq!(
            tracker.format_hierarchy("nobody"),
            crate::render::NO_ACTIVE_GOAL
        );
    }
}
