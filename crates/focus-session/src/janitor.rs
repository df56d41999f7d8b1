// janitor.rs — Archive stale session directories.
//
// Sessions are never deleted. A session directory whose newest file is older
// than the age threshold is moved into `<sessions>/_archive/`. Name
// collisions get a timestamp suffix (and a counter if needed), so an archive
// slot is never overwritten.
//
// Scans are throttled by a sentinel file: a scan runs at most once per
// interval, so session start does not walk the whole tree every time.
//
// Archival is best-effort housekeeping. Per-directory failures are logged
// and counted; nothing here may abort the caller's startup sequence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};

use crate::config::{FocusConfig, ARCHIVE_DIR_NAME};
use crate::error::SessionError;

const SECS_PER_DAY: u64 = 24 * 60 * 60;
const SECS_PER_HOUR: u64 = 60 * 60;

/// Outcome of one cleanup scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Session directories moved into the archive.
    pub archived: usize,
    /// Stale directories that could not be archived.
    pub failed: usize,
}

/// Archives stale session directories on a throttled schedule.
pub struct SessionJanitor {
    sessions_dir: PathBuf,
    archive_dir: PathBuf,
    sentinel: PathBuf,
    interval: Duration,
}

impl SessionJanitor {
    pub fn new(config: &FocusConfig) -> Self {
        Self {
            sessions_dir: config.sessions_dir.clone(),
            archive_dir: config.archive_dir.clone(),
            sentinel: config.cleanup_sentinel.clone(),
            interval: Duration::from_secs(
                config.janitor.interval_hours.saturating_mul(SECS_PER_HOUR),
            ),
        }
    }

    /// True if no scan has been recorded within the throttle interval.
    pub fn should_run(&self) -> bool {
        self.should_run_at(SystemTime::now())
    }

    pub fn should_run_at(&self, now: SystemTime) -> bool {
        let last_run = match fs::metadata(&self.sentinel).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => return true,
        };
        match now.duration_since(last_run) {
            Ok(elapsed) => elapsed > self.interval,
            // Sentinel from the future (clock skew): treat as just run.
            Err(_) => false,
        }
    }

    /// Record that a scan just ran.
    pub fn mark_run(&self) -> Result<(), SessionError> {
        if let Some(parent) = self.sentinel.parent() {
            fs::create_dir_all(parent).map_err(|e| SessionError::io(parent, e))?;
        }
        fs::write(&self.sentinel, Utc::now().to_rfc3339())
            .map_err(|e| SessionError::io(&self.sentinel, e))
    }

    /// Archive every session directory untouched for more than `max_age_days`.
    pub fn cleanup(&self, max_age_days: u64) -> CleanupReport {
        self.cleanup_at(max_age_days, SystemTime::now())
    }

    pub fn cleanup_at(&self, max_age_days: u64, now: SystemTime) -> CleanupReport {
        let mut report = CleanupReport::default();
        let max_age = Duration::from_secs(max_age_days.saturating_mul(SECS_PER_DAY));

        let entries = match fs::read_dir(&self.sessions_dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(
                        "cannot scan sessions dir {}: {}",
                        self.sessions_dir.display(),
                        e
                    );
                }
                return report;
            }
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() || entry.file_name() == ARCHIVE_DIR_NAME {
                continue;
            }

            let newest = match newest_mtime(&path) {
                Ok(mtime) => mtime,
                Err(e) => {
                    tracing::warn!("cannot stat session {}: {}", path.display(), e);
                    report.failed += 1;
                    continue;
                }
            };
            let stale = now
                .duration_since(newest)
                .map(|age| age > max_age)
                .unwrap_or(false);
            if !stale {
                continue;
            }

            match self.archive(&path, now) {
                Ok(target) => {
                    tracing::info!(
                        "archived stale session {} -> {}",
                        path.display(),
                        target.display()
                    );
                    report.archived += 1;
                }
                Err(e) => {
                    tracing::warn!("failed to archive session {}: {}", path.display(), e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Run a cleanup if the throttle allows it, then reset the throttle.
    pub fn run_if_due(&self, max_age_days: u64) -> Option<CleanupReport> {
        if !self.should_run() {
            return None;
        }
        let report = self.cleanup(max_age_days);
        if let Err(e) = self.mark_run() {
            tracing::warn!("failed to record cleanup run: {}", e);
        }
        Some(report)
    }

    fn archive(&self, session_dir: &Path, now: SystemTime) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.archive_dir)?;
        let name = session_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let target = archive_target(&self.archive_dir, &name, now.into());
        fs::rename(session_dir, &target)?;
        Ok(target)
    }
}

/// First free archive path for `name`: the bare name, then a timestamp
/// suffix, then the timestamp plus a counter.
fn archive_target(archive_dir: &Path, name: &str, now: DateTime<Utc>) -> PathBuf {
    let plain = archive_dir.join(name);
    if !plain.exists() {
        return plain;
    }
    let stamp = now.format("%Y%m%dT%H%M%S");
    let stamped = archive_dir.join(format!("{}-{}", name, stamp));
    if !stamped.exists() {
        return stamped;
    }
    (1..)
        .map(|n| archive_dir.join(format!("{}-{}-{}", name, stamp, n)))
        .find(|candidate| !candidate.exists())
        .unwrap_or(stamped)
}

/// Newest modification time of any file under `dir`. A directory with no
/// files reports its own modification time.
fn newest_mtime(dir: &Path) -> io::Result<SystemTime> {
    let mut newest: Option<SystemTime> = None;
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            if metadata.is_dir() {
                pending.push(entry.path());
            } else {
                let mtime = metadata.modified()?;
                newest = Some(newest.map_or(mtime, |n| n.max(mtime)));
            }
        }
    }

    match newest {
        Some(mtime) => Ok(mtime),
        None => fs::metadata(dir)?.modified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(SECS_PER_DAY);

    fn setup() -> (TempDir, FocusConfig, SessionJanitor) {
        let dir = TempDir::new().unwrap();
        let config = FocusConfig::for_home(dir.path());
        fs::create_dir_all(&config.sessions_dir).unwrap();
        let janitor = SessionJanitor::new(&config);
        (dir, config, janitor)
    }

    fn session_with_file(config: &FocusConfig, name: &str, age: Duration) -> PathBuf {
        let session = config.sessions_dir.join(name);
        fs::create_dir_all(&session).unwrap();
        let file = session.join("goal_stack.json");
        fs::write(&file, "{}").unwrap();
        set_age(&file, age);
        session
    }

    fn set_age(path: &Path, age: Duration) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - age).unwrap();
    }

    #[test]
    fn stale_sessions_are_archived_fresh_ones_kept() {
        let (_dir, config, janitor) = setup();
        let stale = session_with_file(&config, "old", DAY * 10);
        let fresh = session_with_file(&config, "new", DAY);

        let report = janitor.cleanup(7);
        assert_eq!(report, CleanupReport { archived: 1, failed: 0 });
        assert!(!stale.exists());
        assert!(config.archive_dir.join("old").join("goal_stack.json").exists());
        assert!(fresh.exists());
    }

    #[test]
    fn newest_nested_file_keeps_session_alive() {
        let (_dir, config, janitor) = setup();
        let session = session_with_file(&config, "mixed", DAY * 30);
        fs::create_dir_all(session.join("notes")).unwrap();
        fs::write(session.join("notes").join("recent.txt"), "x").unwrap();

        assert_eq!(janitor.cleanup(7).archived, 0);
        assert!(session.exists());
    }

    #[test]
    fn archive_collisions_never_overwrite() {
        let (_dir, config, janitor) = setup();
        let occupied = config.archive_dir.join("dup");
        fs::create_dir_all(&occupied).unwrap();
        fs::write(occupied.join("marker"), "earlier archive").unwrap();

        session_with_file(&config, "dup", DAY * 10);
        assert_eq!(janitor.cleanup(7).archived, 1);

        assert_eq!(
            fs::read_to_string(occupied.join("marker")).unwrap(),
            "earlier archive"
        );
        let archived: Vec<String> = fs::read_dir(&config.archive_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(archived.len(), 2);
        assert!(archived.iter().any(|n| n.starts_with("dup-")));
    }

    #[test]
    fn archive_target_adds_counter_when_stamp_taken() {
        let dir = TempDir::new().unwrap();
        let now = Utc::now();
        let first = archive_target(dir.path(), "s", now);
        fs::create_dir_all(&first).unwrap();
        let second = archive_target(dir.path(), "s", now);
        fs::create_dir_all(&second).unwrap();
        let third = archive_target(dir.path(), "s", now);

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(third.to_string_lossy().ends_with("-1"));
    }

    #[test]
    fn archive_dir_and_plain_files_are_skipped() {
        let (_dir, config, janitor) = setup();
        fs::create_dir_all(&config.archive_dir).unwrap();
        fs::write(&config.cleanup_sentinel, "x").unwrap();
        set_age(&config.cleanup_sentinel, DAY * 30);

        assert_eq!(janitor.cleanup(7), CleanupReport::default());
        assert!(config.archive_dir.exists());
        assert!(config.cleanup_sentinel.exists());
    }

    #[test]
    fn missing_sessions_dir_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        let janitor = SessionJanitor::new(&FocusConfig::for_home(dir.path().join("absent")));
        assert_eq!(janitor.cleanup(7), CleanupReport::default());
    }

    #[test]
    fn throttle_follows_sentinel_age() {
        let (_dir, config, janitor) = setup();
        assert!(janitor.should_run());

        janitor.mark_run().unwrap();
        assert!(!janitor.should_run());

        set_age(&config.cleanup_sentinel, Duration::from_secs(25 * SECS_PER_HOUR));
        assert!(janitor.should_run());
    }

    #[test]
    fn huge_thresholds_saturate_instead_of_overflowing() {
        let (_dir, mut config, _) = setup();
        let stale = session_with_file(&config, "old", DAY * 10);

        config.janitor.interval_hours = u64::MAX;
        let janitor = SessionJanitor::new(&config);
        assert_eq!(janitor.cleanup(u64::MAX / 1000), CleanupReport::default());
        assert_eq!(janitor.cleanup(u64::MAX), CleanupReport::default());
        assert!(stale.exists());

        janitor.mark_run().unwrap();
        assert!(!janitor.should_run());
    }

    #[test]
    fn run_if_due_runs_once_per_interval() {
        let (_dir, config, janitor) = setup();
        session_with_file(&config, "old", DAY * 10);

        assert_eq!(janitor.run_if_due(7).unwrap().archived, 1);
        assert!(janitor.run_if_due(7).is_none());
    }
}
