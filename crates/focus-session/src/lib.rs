//! # focus-session
//!
//! Session-scoped goal stacks and the cross-session focus pointer.
//!
//! Each agent session keeps an ordered stack of [`Goal`](focus_goal::Goal)s,
//! current focus first. Top-level goals (epics and issues) are mirrored into
//! one shared [`GlobalPointer`] so that tools outside the session can see
//! the active top-level goal. Every invocation is a short-lived process:
//! load, compute, persist, exit.
//!
//! ## Key components
//!
//! - [`GoalTracker`] — push/pop/query over a session's stack, with pointer sync
//! - [`SessionStore`] — JSON file persistence, lenient loads, directory drift correction
//! - [`GlobalPointer`] / [`GlobalSync`] — scope-arbitrated shared pointer
//! - [`SessionJanitor`] — throttled archival of stale session directories
//! - [`resolve_session_id`] — explicit → environment → (parent pid, cwd) derivation
//! - [`FocusConfig`] — on-disk layout and TOML tunables

pub mod config;
pub mod error;
pub mod global;
pub mod janitor;
pub mod render;
pub mod session_id;
pub mod stack;
pub mod store;
pub mod tracker;

pub use config::{FocusConfig, FocusSettings, JanitorConfig};
pub use error::SessionError;
pub use global::{GlobalPointer, GlobalSync, Publication, SyncWrite};
pub use janitor::{CleanupReport, SessionJanitor};
pub use render::render_hierarchy;
pub use session_id::resolve_session_id;
pub use stack::{GoalStack, PoppedGoal, PushOutcome, SessionStack};
pub use store::SessionStore;
pub use tracker::GoalTracker;
