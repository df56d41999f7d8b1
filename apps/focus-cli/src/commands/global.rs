// global.rs — Show the shared cross-session focus pointer.

use focus_session::GlobalSync;

use super::FocusContext;

pub fn execute(ctx: &FocusContext, json: bool) -> anyhow::Result<()> {
    let pointer = GlobalSync::new(&ctx.config.global_pointer).load();

    if json {
        println!("{}", serde_json::to_string_pretty(&pointer)?);
        return Ok(());
    }

    match &pointer.content {
        Some(content) => {
            println!("Global focus: {}", content.summary);
            println!("  Goal:     {}", content.goal_id);
            println!("  Session:  {}", content.session_id);
            println!("  Updated:  {}", content.updated_at.to_rfc3339());
            for (label, value) in content.fields.labeled() {
                println!("  {:<13}{}", format!("{}:", label), value);
            }
        }
        None => println!("No global focus set."),
    }

    match &pointer.owner_scope {
        Some(scope) => println!("Owner scope: {}", scope.display()),
        None => println!("Owner scope: (unclaimed)"),
    }
    if !pointer.linked_issues.is_empty() {
        println!("Linked issues: {}", pointer.linked_issues.join(", "));
    }
    if let Some(spec) = &pointer.linked_spec {
        println!("Linked spec: {}", spec);
    }

    if !pointer.history.is_empty() {
        println!("\nRecently cleared:");
        for entry in pointer.history.entries().iter().rev() {
            println!(
                "  {}  {}",
                entry.cleared_at.format("%Y-%m-%d %H:%M:%S"),
                entry.summary
            );
        }
    }
    Ok(())
}
