// session_id.rs — Resolve which session an invocation belongs to.
//
// Every hook or command runs as a short-lived process. To land on the same
// stack as its siblings it picks a session id in this order:
//   1. an id passed explicitly by the caller
//   2. an id exported in the environment by the agent host
//   3. an id derived from (parent pid, working directory)
//
// The derived id lets independent invocations spawned from the same shell
// coalesce onto one session without any coordination.

use std::path::Path;

use sha2::{Digest, Sha256};

/// Primary environment variable carrying the session id.
pub const SESSION_ENV: &str = "FOCUS_SESSION_ID";

/// Secondary variable exported by some agent hosts.
pub const HOST_SESSION_ENV: &str = "CLAUDE_SESSION_ID";

/// Resolve the session id for the current process.
pub fn resolve_session_id(explicit: Option<&str>) -> String {
    let env_id = std::env::var(SESSION_ENV)
        .ok()
        .or_else(|| std::env::var(HOST_SESSION_ENV).ok());
    let cwd = std::env::current_dir().unwrap_or_default();
    resolve_with(explicit, env_id.as_deref(), parent_pid(), &cwd)
}

/// Resolution logic with every input supplied by the caller.
pub fn resolve_with(explicit: Option<&str>, env_id: Option<&str>, ppid: u32, cwd: &Path) -> String {
    [explicit, env_id]
        .into_iter()
        .flatten()
        .find(|id| !id.trim().is_empty())
        .map(sanitize_session_id)
        .unwrap_or_else(|| derive_session_id(ppid, cwd))
}

/// Deterministic id for a (parent pid, working directory) pair.
pub fn derive_session_id(ppid: u32, cwd: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(ppid.to_string().as_bytes());
    hasher.update([0u8]);
    hasher.update(cwd.to_string_lossy().as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().take(8).map(|b| format!("{:02x}", b)).collect();
    format!("ppid-{}", hex)
}

/// Make an id safe to use as a single directory name.
///
/// Keeps `[A-Za-z0-9._-]` and replaces everything else with `_`. Ids that
/// would still name the root or its parent (empty, `.`, `..`) become `_`.
pub fn sanitize_session_id(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    cleaned
}

#[cfg(unix)]
fn parent_pid() -> u32 {
    std::os::unix::process::parent_id()
}

#[cfg(not(unix))]
fn parent_pid() -> u32 {
    std::process::id()
}
