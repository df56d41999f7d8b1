// stack.rs — In-memory goal stack for one session.
//
// Storage is leaf-first: the front of the stack is the current focus (the
// most specific active goal), and each step back is a broader goal. Display
// is root-first. GoalStack only exposes named operations for both views so
// callers never do index arithmetic on the raw sequence.
//
// A single linear stack models one agent session's one active line of work.
// Branching belongs to the external task tracker, not here.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use focus_goal::Goal;
use serde::{Deserialize, Serialize};

/// Maximum entries kept in a session's pop history.
pub const SESSION_HISTORY_LIMIT: usize = 20;

/// An ordered sequence of goals, current focus first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct GoalStack {
    goals: VecDeque<Goal>,
}

impl GoalStack {
    /// Make `goal` the current focus. Existing goals keep their relative
    /// order. Returns false (and changes nothing) if the id is already present.
    pub fn push_front(&mut self, goal: Goal) -> bool {
        if self.contains(&goal.id) {
            return false;
        }
        self.goals.push_front(goal);
        true
    }

    /// Remove and return the current focus.
    pub fn pop_front(&mut self) -> Option<Goal> {
        self.goals.pop_front()
    }

    /// The current focus.
    pub fn focus(&self) -> Option<&Goal> {
        self.goals.front()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.goals.iter().any(|g| g.id == id)
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    /// Current focus first, broadest goal last.
    pub fn iter_leaf_first(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    /// Broadest goal first, current focus last.
    pub fn to_root_first_order(&self) -> Vec<Goal> {
        self.goals.iter().rev().cloned().collect()
    }
}

/// Most-recent-N sequence. Appending past the bound evicts the oldest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct BoundedHistory<T, const N: usize> {
    entries: Vec<T>,
}

impl<T, const N: usize> Default for BoundedHistory<T, N> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T, const N: usize> BoundedHistory<T, N> {
    /// Append `entry`, then drop the oldest entries beyond `N`.
    pub fn record(&mut self, entry: T) {
        self.entries.push(entry);
        if self.entries.len() > N {
            let excess = self.entries.len() - N;
            self.entries.drain(..excess);
        }
    }

    /// Oldest first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&T> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A goal that left the stack.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PoppedGoal {
    pub goal: Goal,
    pub popped_at: DateTime<Utc>,
    pub popped_by: String,
    pub succeeded: bool,
}

pub type SessionHistory = BoundedHistory<PoppedGoal, SESSION_HISTORY_LIMIT>;

/// Result of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The goal is now the current focus.
    Pushed,
    /// A goal with the same id was already on the stack; nothing changed.
    Duplicate,
}

/// Everything persisted for one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionStack {
    pub session_id: String,

    /// Directory the owning session last ran in.
    pub working_directory: PathBuf,

    #[serde(default)]
    pub stack: GoalStack,

    #[serde(default)]
    pub history: SessionHistory,

    pub last_modified: DateTime<Utc>,
}

impl SessionStack {
    /// A fresh, empty stack.
    pub fn new(session_id: impl Into<String>, working_directory: impl Into<PathBuf>) -> Self {
        Self {
            session_id: session_id.into(),
            working_directory: working_directory.into(),
            stack: GoalStack::default(),
            history: SessionHistory::default(),
            last_modified: Utc::now(),
        }
    }

    /// Push `goal` as the new focus unless its id is already on the stack.
    pub fn push(&mut self, goal: Goal) -> PushOutcome {
        if self.stack.push_front(goal) {
            PushOutcome::Pushed
        } else {
            PushOutcome::Duplicate
        }
    }

    /// Pop the current focus into history. `None` on an empty stack.
    pub fn pop(&mut self, succeeded: bool, popped_by: &str) -> Option<Goal> {
        let goal = self.stack.pop_front()?;
        self.history.record(PoppedGoal {
            goal: goal.clone(),
            popped_at: Utc::now(),
            popped_by: popped_by.to_string(),
            succeeded,
        });
        Some(goal)
    }

    /// Pop only if `id` is the current focus. Anything else is a no-op, so a
    /// completion event for a broader goal cannot close the wrong one.
    pub fn pop_by_id(&mut self, id: &str, succeeded: bool, popped_by: &str) -> Option<Goal> {
        match self.stack.focus() {
            Some(focus) if focus.id == id => self.pop(succeeded, popped_by),
            _ => None,
        }
    }
}
