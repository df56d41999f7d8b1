// render.rs — Plain-text rendering of a session's goal hierarchy.

use focus_goal::Goal;

pub const NO_ACTIVE_GOAL: &str = "No active goal for this session.";
pub const FOCUS_MARKER: &str = "◀ current focus";

/// Render goals (root first, current focus last) as an indented tree,
/// followed by the current focus's descriptive fields.
pub fn render_hierarchy(root_first: &[Goal]) -> String {
    let Some(focus) = root_first.last() else {
        return NO_ACTIVE_GOAL.to_string();
    };

    let mut out = String::from("Goal hierarchy:\n");
    let last = root_first.len() - 1;
    for (depth, goal) in root_first.iter().enumerate() {
        if depth > 0 {
            out.push_str(&"    ".repeat(depth - 1));
            out.push_str("  └─ ");
        }
        out.push_str(&format!("[{}] {}", goal.kind, goal.summary));
        if depth == last {
            out.push_str("  ");
            out.push_str(FOCUS_MARKER);
        }
        out.push('\n');
    }

    out.push_str("\nCurrent focus fields:\n");
    for (label, value) in focus.fields.labeled() {
        out.push_str(&format!("  {:<13}{}\n", format!("{}:", label), value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use focus_goal::{GoalFields, GoalKind, GoalSource};

    fn goal(kind: GoalKind, summary: &str) -> Goal {
        Goal::new(
            summary,
            kind,
            summary,
            GoalFields {
                who: "Alice".to_string(),
                ..GoalFields::default()
            },
            GoalSource::manual(),
            "test",
        )
    }

    #[test]
    fn empty_hierarchy_reports_no_goal() {
        assert_eq!(render_hierarchy(&[]), NO_ACTIVE_GOAL);
    }

    #[test]
    fn tree_is_indented_and_focus_marked() {
        let goals = vec![
            goal(GoalKind::Epic, "Migrate billing"),
            goal(GoalKind::Issue, "Fix invoice rounding"),
            goal(GoalKind::Task, "Round to 2 decimals"),
        ];
        let text = render_hierarchy(&goals);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Goal hierarchy:");
        assert_eq!(lines[1], "[epic] Migrate billing");
        assert_eq!(lines[2], "  └─ [issue] Fix invoice rounding");
        assert_eq!(
            lines[3],
            "      └─ [task] Round to 2 decimals  ◀ current focus"
        );
        assert_eq!(text.matches(FOCUS_MARKER).count(), 1);
        assert!(text.contains("Current focus fields:"));
        assert!(text.contains("  WHO:         Alice"));
        assert!(text.contains("  MEASURED BY: Success metrics not defined"));
    }

    #[test]
    fn single_goal_is_root_and_focus() {
        let text = render_hierarchy(&[goal(GoalKind::Task, "Solo")]);
        assert!(text.contains("[task] Solo  ◀ current focus"));
    }
}
