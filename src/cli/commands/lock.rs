//! CLI implementation for `wharf lock` command
//!
//! Regenerates deploy lockfiles from the current manifests and cache without
//! rewriting the project lockfile. From a non-root workspace this covers just
//! that workspace.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::cache::{cache_dir, PackageCache};
use crate::cli::output::{self, ConsoleReport, OutputConfig};
use crate::core::deploy::generate_deploy_lockfiles;
use crate::core::project::Project;
use crate::core::report::Report;

/// Execute the lock command
pub async fn execute(start_dir: &Path, cache_override: Option<&Path>) -> Result<()> {
    let project = Project::find(start_dir)
        .with_context(|| format!("Failed to load project from {}", start_dir.display()))?;

    let cache_path = cache_dir(cache_override);
    let cache = PackageCache::open(&cache_path)
        .with_context(|| format!("Failed to open package cache at {}", cache_path.display()))?;

    let report: Arc<dyn Report> = Arc::new(ConsoleReport);
    let outcome = generate_deploy_lockfiles(Arc::new(project), Arc::new(cache), report).await?;

    if outcome.targets() == 0 {
        output::warning("No deploy targets match the configured patterns");
    } else {
        output::success(&format!(
            "{} deploy lockfile(s) written, {} unchanged",
            outcome.updated.len(),
            outcome.unchanged.len()
        ));
    }

    if OutputConfig::global().json {
        output::emit_json(&serde_json::json!({
            "event": "summary",
            "command": "lock",
            "updated": outcome.updated,
            "unchanged": outcome.unchanged,
            "failed": outcome.failed.iter().map(|(t, _)| t).collect::<Vec<_>>(),
        }));
    }

    if !outcome.is_success() {
        bail!("{} deploy target(s) failed", outcome.failed.len());
    }
    Ok(())
}
