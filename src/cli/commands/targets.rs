//! CLI implementation for `wharf targets` command
//!
//! Shows which workspaces the deploy patterns select from the current
//! directory, without resolving or writing anything.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::{self, OutputConfig};
use crate::core::project::Project;

/// Execute the targets command
pub async fn execute(start_dir: &Path) -> Result<()> {
    let project = Project::find(start_dir)
        .with_context(|| format!("Failed to load project from {}", start_dir.display()))?;
    let targets = project.deploy_targets()?;

    if OutputConfig::global().json {
        let listed: Vec<serde_json::Value> = targets
            .iter()
            .map(|ws| {
                serde_json::json!({
                    "name": ws.name(),
                    "path": ws.rel_path(),
                    "version": ws.version(),
                })
            })
            .collect();
        output::emit_json(&serde_json::Value::Array(listed));
        return Ok(());
    }

    if targets.is_empty() {
        output::warning("No deploy targets match the configured patterns");
        return Ok(());
    }

    for ws in targets {
        println!("{} ({})", ws.name(), ws.rel_path());
    }
    Ok(())
}
