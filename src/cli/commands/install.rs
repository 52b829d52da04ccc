//! CLI implementation for `wharf install` command
//!
//! Resolves the whole project, refreshes the project lockfile, and fans out
//! deploy lockfile generation across the configured targets.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cache::{cache_dir, PackageCache};
use crate::cli::output::{self, ConsoleReport, OutputConfig};
use crate::config::defaults::PROJECT_LOCKFILE_NAME;
use crate::core::install::install;
use crate::core::lockfile::WriteOutcome;
use crate::core::project::Project;
use crate::core::report::Report;

/// Execute the install command
pub async fn execute(start_dir: &Path, cache_override: Option<&Path>) -> Result<()> {
    let project = Project::find(start_dir)
        .with_context(|| format!("Failed to load project from {}", start_dir.display()))?;

    let cache_path = cache_dir(cache_override);
    let cache = PackageCache::open(&cache_path)
        .with_context(|| format!("Failed to open package cache at {}", cache_path.display()))?;

    let report: Arc<dyn Report> = Arc::new(ConsoleReport);
    let outcome = install(Arc::new(project), Arc::new(cache), report).await?;

    match outcome.project_lockfile {
        WriteOutcome::Updated => output::detail(&format!("{PROJECT_LOCKFILE_NAME} updated")),
        WriteOutcome::Unchanged => output::detail(&format!("{PROJECT_LOCKFILE_NAME} unchanged")),
    }

    let deploy = &outcome.deploy;
    if deploy.targets() == 0 {
        output::success("Install finished, no deploy targets configured");
    } else {
        output::success(&format!(
            "Install finished: {} deploy lockfile(s) written, {} unchanged",
            deploy.updated.len(),
            deploy.unchanged.len()
        ));
    }

    if OutputConfig::global().json {
        output::emit_json(&serde_json::json!({
            "event": "summary",
            "command": "install",
            "updated": deploy.updated,
            "unchanged": deploy.unchanged,
            "failed": deploy.failed.iter().map(|(t, _)| t).collect::<Vec<_>>(),
        }));
    }

    if !deploy.is_success() {
        bail!("{} deploy target(s) failed", deploy.failed.len());
    }
    Ok(())
}
