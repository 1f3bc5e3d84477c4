use crate::services::utils::{get_workspace_crates, render_crate_table};
use anyhow::Result;

/// Workspace groups and the directories they live in.
const GROUPS: [(&str, &str); 4] = [
    ("Applications", "apps"),
    ("Features", "crates/features"),
    ("Shared", "crates/shared"),
    ("Infrastructure", "infra"),
];

/// Lists the crates of every workspace group.
///
/// # Errors
/// Returns an error if a group directory cannot be read or crate metadata cannot be parsed.
pub fn list_crates() -> Result<()> {
    for (title, dir) in GROUPS {
        let crates = get_workspace_crates(dir)?;

        if crates.is_empty() {
            println!("ℹ️ No crates found in '{dir}/'.");
            continue;
        }

        render_crate_table(title, &crates);
    }

    Ok(())
}
