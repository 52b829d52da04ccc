//! CLI implementation for `wharf init` command

use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::cli::output::{self, OutputConfig};
use crate::core::init::init_project;

/// Execute the init command
pub async fn execute(dir: &Path, name: Option<String>) -> Result<()> {
    let name = match name {
        Some(name) => name,
        None => dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                anyhow!(
                    "Cannot derive a package name from {}; pass --name",
                    dir.display()
                )
            })?,
    };

    let path = init_project(dir, &name)
        .with_context(|| format!("Failed to initialize project in {}", dir.display()))?;

    if OutputConfig::global().json {
        output::emit_json(&serde_json::json!({
            "event": "init",
            "name": name,
            "manifest": path.display().to_string(),
        }));
        return Ok(());
    }

    output::success(&format!("Created {}", path.display()));
    output::detail("Add member globs to [workspace].members, then run 'wharf install'");
    Ok(())
}
