// session.rs — Session subcommands: start, id, list, cleanup.

use clap::Subcommand;
use focus_session::{CleanupReport, SessionJanitor, SessionStore};

use super::FocusContext;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Session-start hook: archive stale sessions if due, print the session id.
    Start,
    /// Print the resolved session id.
    Id,
    /// List session directories.
    List,
    /// Archive stale sessions now.
    Cleanup {
        /// Ignore the once-per-interval throttle.
        #[arg(long)]
        force: bool,
        /// Override the configured age threshold.
        #[arg(long)]
        max_age_days: Option<u64>,
    },
}

pub fn execute(cmd: &SessionCommands, ctx: &FocusContext) -> anyhow::Result<()> {
    match cmd {
        SessionCommands::Start => {
            let janitor = SessionJanitor::new(&ctx.config);
            if let Some(report) = janitor.run_if_due(ctx.config.janitor.max_age_days) {
                tracing::info!(
                    archived = report.archived,
                    failed = report.failed,
                    "session start cleanup"
                );
            }
            println!("{}", ctx.session_id);
            Ok(())
        }
        SessionCommands::Id => {
            println!("{}", ctx.session_id);
            Ok(())
        }
        SessionCommands::List => list_sessions(ctx),
        SessionCommands::Cleanup {
            force,
            max_age_days,
        } => {
            let max_age_days = max_age_days.unwrap_or(ctx.config.janitor.max_age_days);
            let janitor = SessionJanitor::new(&ctx.config);
            let report = if *force {
                let report = janitor.cleanup(max_age_days);
                janitor.mark_run()?;
                Some(report)
            } else {
                janitor.run_if_due(max_age_days)
            };
            print_report(report, max_age_days);
            Ok(())
        }
    }
}

fn list_sessions(ctx: &FocusContext) -> anyhow::Result<()> {
    let store = SessionStore::new(&ctx.config.sessions_dir)?;
    let sessions = store.list()?;
    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!("{:<40} {:<6} {:<30}", "SESSION", "DEPTH", "FOCUS");
    println!("{}", "-".repeat(78));
    for id in &sessions {
        let stack = store.peek(id);
        let focus = stack
            .stack
            .focus()
            .map(|g| super::truncate(&g.summary, 28))
            .unwrap_or_else(|| "-".to_string());
        let marker = if *id == ctx.session_id { "*" } else { " " };
        println!(
            "{}{:<39} {:<6} {:<30}",
            marker,
            id,
            stack.stack.len(),
            focus
        );
    }
    println!("\n{} session(s).", sessions.len());
    Ok(())
}

fn print_report(report: Option<CleanupReport>, max_age_days: u64) {
    match report {
        Some(report) => {
            println!(
                "Archived {} session(s) idle for more than {} day(s).",
                report.archived, max_age_days
            );
            if report.failed > 0 {
                println!("{} session(s) could not be archived; see logs.", report.failed);
            }
        }
        None => println!("Cleanup already ran recently; use --force to run it now."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    use focus_session::store::STACK_FILE_NAME;
    use focus_session::{FocusConfig, SessionStack};
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> FocusContext {
        FocusContext {
            config: FocusConfig::for_home(dir.path()),
            session_id: "session-test".to_string(),
        }
    }

    #[test]
    fn start_marks_cleanup_as_run() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        execute(&SessionCommands::Start, &ctx).unwrap();
        assert!(ctx.config.cleanup_sentinel.exists());
        assert!(!SessionJanitor::new(&ctx.config).should_run());
    }

    #[test]
    fn forced_cleanup_ignores_throttle() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        execute(&SessionCommands::Start, &ctx).unwrap();
        execute(
            &SessionCommands::Cleanup {
                force: true,
                max_age_days: Some(1),
            },
            &ctx,
        )
        .unwrap();
    }

    #[test]
    fn list_does_not_touch_other_sessions() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        let other = SessionStore::new(&ctx.config.sessions_dir)
            .unwrap()
            .with_working_dir("/proj/other");
        let mut stack = other.load("idle");
        stack.push(
            focus_goal::manual_goal(focus_goal::GoalKind::Task, "Old work", None, "manual")
                .unwrap(),
        );
        other.save(&mut stack).unwrap();
        let file = other.session_dir("idle").join(STACK_FILE_NAME);
        std::fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(SystemTime::now() - Duration::from_secs(10 * 24 * 60 * 60))
            .unwrap();

        list_sessions(&ctx).unwrap();

        let raw = std::fs::read_to_string(&file).unwrap();
        let on_disk: SessionStack = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk.working_directory, PathBuf::from("/proj/other"));
        assert_eq!(SessionJanitor::new(&ctx.config).cleanup(7).archived, 1);
    }

    #[test]
    fn list_shows_pushed_sessions() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let goal =
            focus_goal::manual_goal(focus_goal::GoalKind::Task, "Write docs", None, "manual")
                .unwrap();
        ctx.tracker().unwrap().push(&ctx.session_id, goal).unwrap();

        let store = SessionStore::new(&ctx.config.sessions_dir).unwrap();
        assert_eq!(store.list().unwrap(), vec!["session-test".to_string()]);
        list_sessions(&ctx).unwrap();
    }
}
