//! Project install
//!
//! Resolves the full workspace graph against the package cache, refreshes the
//! project lockfile at the root, then fans out deploy lockfile generation.
//! The project lockfile keeps project-relative workspace references; only the
//! per-target deploy lockfiles get the portable rewrite.

use std::sync::Arc;

use crate::cache::PackageCache;
use crate::config::defaults::PROJECT_LOCKFILE_NAME;
use crate::core::deploy::{generate_deploy_lockfiles, DeployOutcome};
use crate::core::lockfile::{Lockfile, WriteOutcome};
use crate::core::project::Project;
use crate::core::report::Report;
use crate::core::resolver::Resolver;
use crate::core::workspace::Workspace;
use crate::error::WharfError;

/// Result of a full install
#[derive(Debug)]
pub struct InstallOutcome {
    pub project_lockfile: WriteOutcome,
    pub deploy: DeployOutcome,
}

/// Run a full install.
///
/// The whole project graph is resolved no matter where the command started;
/// the deploy fan-out afterwards covers the configured targets on a root
/// invocation and just the starting workspace otherwise. A resolution
/// failure anywhere in the project graph fails the install before any
/// lockfile is touched. Deploy generation degrades per target, reported
/// through [`DeployOutcome`].
pub async fn install(
    project: Arc<Project>,
    cache: Arc<PackageCache>,
    report: Arc<dyn Report>,
) -> Result<InstallOutcome, WharfError> {
    // Deploy patterns must compile before any resolution work starts. A
    // workspace-scoped run never reads them, so nothing is checked there.
    if project.starting_workspace().is_root() {
        project.deploy_patterns()?;
    }

    let graph = {
        let resolver = Resolver::new(project.workspaces(), &cache);
        let active: Vec<&Workspace> = project.workspaces().iter().collect();
        resolver.resolve(&active)?
    };

    let path = project.root_dir().join(PROJECT_LOCKFILE_NAME);
    let project_lockfile = Lockfile::from_graph(&graph).write_if_changed(&path)?;
    tracing::info!(
        path = %path.display(),
        outcome = ?project_lockfile,
        "project lockfile refreshed"
    );

    let deploy = generate_deploy_lockfiles(Arc::clone(&project), cache, report).await?;

    Ok(InstallOutcome {
        project_lockfile,
        deploy,
    })
}
