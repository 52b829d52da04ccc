//! Deploy lockfile generation
//!
//! For every deploy target this resolves a dependency graph seeded at that
//! single workspace, canonicalizes the target's own references, and writes
//! `wharf.deploy.lock` into the target directory when the bytes changed.
//! Targets are independent: they run as concurrent tasks over the shared
//! read-only cache, and one failing target never stops the others. The run
//! as a whole fails only for configuration errors caught before any
//! resolution starts.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;

use crate::cache::PackageCache;
use crate::core::canonical;
use crate::core::lockfile::{Lockfile, WriteOutcome};
use crate::core::project::Project;
use crate::core::report::Report;
use crate::core::resolver::Resolver;
use crate::core::workspace::Workspace;
use crate::error::WharfError;

/// Aggregated result of one deploy generation run
#[derive(Debug, Default)]
pub struct DeployOutcome {
    /// Targets whose lockfile was written
    pub updated: Vec<String>,
    /// Targets whose lockfile already matched
    pub unchanged: Vec<String>,
    /// Targets that failed, with the rendered error
    pub failed: Vec<(String, String)>,
}

impl DeployOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn targets(&self) -> usize {
        self.updated.len() + self.unchanged.len() + self.failed.len()
    }
}

/// Generate deploy lockfiles for every target of this invocation.
///
/// Targets are selected before anything else; on a root invocation that
/// compiles the deploy patterns, and a malformed one fails the run up
/// front. After that each target gets its own task; per-target errors land
/// in [`DeployOutcome::failed`] and are never promoted to the run-level
/// error.
pub async fn generate_deploy_lockfiles(
    project: Arc<Project>,
    cache: Arc<PackageCache>,
    report: Arc<dyn Report>,
) -> Result<DeployOutcome, WharfError> {
    let targets: Vec<Workspace> = project.deploy_targets()?.into_iter().cloned().collect();
    let deploy_references: Arc<BTreeSet<String>> =
        Arc::new(targets.iter().map(Workspace::reference).collect());

    tracing::info!(targets = targets.len(), "generating deploy lockfiles");

    let mut names = Vec::with_capacity(targets.len());
    let mut tasks = Vec::with_capacity(targets.len());
    for target in targets {
        names.push(target.name().to_string());

        let project = Arc::clone(&project);
        let cache = Arc::clone(&cache);
        let report = Arc::clone(&report);
        let deploy_references = Arc::clone(&deploy_references);
        tasks.push(tokio::spawn(async move {
            let result = generate_for_target(&project, &cache, &deploy_references, &target);
            match &result {
                Ok(WriteOutcome::Updated) => report.lockfile_updated(target.name()),
                Ok(WriteOutcome::Unchanged) => report.lockfile_unchanged(target.name()),
                Err(e) => report.lockfile_failed(target.name(), &e.to_string()),
            }
            result
        }));
    }

    let mut outcome = DeployOutcome::default();
    for (name, joined) in names.into_iter().zip(join_all(tasks).await) {
        match joined {
            Ok(Ok(WriteOutcome::Updated)) => outcome.updated.push(name),
            Ok(Ok(WriteOutcome::Unchanged)) => outcome.unchanged.push(name),
            Ok(Err(e)) => {
                tracing::warn!(workspace = name.as_str(), error = %e, "deploy target failed");
                outcome.failed.push((name, e.to_string()));
            }
            Err(e) => {
                tracing::warn!(workspace = name.as_str(), error = %e, "deploy task aborted");
                outcome.failed.push((name, format!("task aborted: {e}")));
            }
        }
    }
    Ok(outcome)
}

/// Resolve, canonicalize, and persist one target's lockfile
fn generate_for_target(
    project: &Project,
    cache: &PackageCache,
    deploy_references: &BTreeSet<String>,
    target: &Workspace,
) -> Result<WriteOutcome, WharfError> {
    tracing::debug!(workspace = target.locator().as_str(), "resolving deploy target");

    // Fresh resolution seeded at this one workspace; the resolver still sees
    // the full workspace map for sibling lookups.
    let resolver = Resolver::new(project.workspaces(), cache);
    let mut graph = resolver.resolve(&[target])?;

    canonical::canonicalize(&mut graph, &target.reference(), deploy_references);

    let lockfile = Lockfile::from_graph(&graph);
    let outcome = lockfile.write_if_changed(&target.deploy_lockfile_path())?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::{CACHE_INDEX_FILE_NAME, MANIFEST_FILE_NAME};
    use crate::core::report::MemoryReport;

    struct Fixture {
        dir: tempfile::TempDir,
        cache_dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new(root_manifest: &str, index: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join(MANIFEST_FILE_NAME), root_manifest).unwrap();
            let cache_dir = tempfile::tempdir().unwrap();
            std::fs::write(cache_dir.path().join(CACHE_INDEX_FILE_NAME), index).unwrap();
            Self { dir, cache_dir }
        }

        fn workspace(&self, rel: &str, manifest: &str) -> &Self {
            let dir = self.dir.path().join(rel);
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join(MANIFEST_FILE_NAME), manifest).unwrap();
            self
        }

        fn load(&self) -> (Arc<Project>, Arc<PackageCache>) {
            let project = Project::find(self.dir.path()).unwrap();
            let cache = PackageCache::open(self.cache_dir.path()).unwrap();
            (Arc::new(project), Arc::new(cache))
        }

        fn deploy_lock(&self, rel: &str) -> std::io::Result<String> {
            std::fs::read_to_string(self.dir.path().join(rel).join("wharf.deploy.lock"))
        }
    }

    const ROOT: &str = "[package]\nname = \"root\"\nversion = \"0.1.0\"\n\n[workspace]\nmembers = [\"apps/*\", \"libs/*\"]\ndeploy = [\"apps/*\"]\n";

    const INDEX: &str = r#"
[packages.lodash."4.17.21"]
checksum = "sha512-abc"
"#;

    fn web_manifest() -> &'static str {
        "[package]\nname = \"web\"\nversion = \"1.0.0\"\n\n[dependencies]\nshared = \"workspace:libs/shared\"\nlodash = \"^4.17.0\"\n"
    }

    #[tokio::test]
    async fn writes_one_lockfile_per_target() {
        let fx = Fixture::new(ROOT, INDEX);
        fx.workspace("apps/web", web_manifest())
            .workspace("apps/api", "[package]\nname = \"api\"\nversion = \"1.0.0\"\n")
            .workspace("libs/shared", "[package]\nname = \"shared\"\nversion = \"2.0.0\"\n");
        let (project, cache) = fx.load();
        let report = Arc::new(MemoryReport::new());

        let outcome = generate_deploy_lockfiles(project, cache, report).await.unwrap();

        assert_eq!(outcome.updated, ["api", "web"]);
        assert!(outcome.is_success());
        assert!(fx.deploy_lock("apps/web").is_ok());
        assert!(fx.deploy_lock("apps/api").is_ok());
        assert!(fx.deploy_lock("libs/shared").is_err());
    }

    #[tokio::test]
    async fn target_lockfile_uses_portable_self_reference() {
        let fx = Fixture::new(ROOT, INDEX);
        fx.workspace("apps/web", web_manifest())
            .workspace("libs/shared", "[package]\nname = \"shared\"\nversion = \"2.0.0\"\n");
        let (project, cache) = fx.load();

        generate_deploy_lockfiles(project, cache, Arc::new(MemoryReport::new()))
            .await
            .unwrap();

        let lock = fx.deploy_lock("apps/web").unwrap();
        assert!(lock.contains("[entries.\"web@workspace:.\"]"));
        assert!(lock.contains("resolution = \"web@workspace:.\""));
        assert!(lock.contains("resolution = \"shared@workspace:libs/shared\""));
        assert!(!lock.contains("workspace:apps/web"));
    }

    #[tokio::test]
    async fn rerun_without_changes_touches_nothing() {
        let fx = Fixture::new(ROOT, INDEX);
        fx.workspace("apps/web", web_manifest())
            .workspace("libs/shared", "[package]\nname = \"shared\"\nversion = \"2.0.0\"\n");

        let (project, cache) = fx.load();
        let first = generate_deploy_lockfiles(project, cache, Arc::new(MemoryReport::new()))
            .await
            .unwrap();
        assert_eq!(first.updated, ["web"]);

        let (project, cache) = fx.load();
        let report = Arc::new(MemoryReport::new());
        let second = generate_deploy_lockfiles(project, cache, Arc::clone(&report) as Arc<dyn Report>)
            .await
            .unwrap();

        assert_eq!(second.unchanged, ["web"]);
        assert!(second.updated.is_empty());
        assert_eq!(report.lines(), ["web: No change"]);
    }

    #[tokio::test]
    async fn one_failing_target_does_not_stop_the_others() {
        let fx = Fixture::new(ROOT, INDEX);
        fx.workspace("apps/web", web_manifest())
            .workspace(
                "apps/broken",
                "[package]\nname = \"broken\"\nversion = \"1.0.0\"\n\n[dependencies]\nleft-pad = \"^9.0.0\"\n",
            )
            .workspace("libs/shared", "[package]\nname = \"shared\"\nversion = \"2.0.0\"\n");
        let (project, cache) = fx.load();

        let outcome = generate_deploy_lockfiles(project, cache, Arc::new(MemoryReport::new()))
            .await
            .unwrap();

        assert_eq!(outcome.updated, ["web"]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, "broken");
        assert!(outcome.failed[0].1.contains("left-pad"));
        assert!(fx.deploy_lock("apps/web").is_ok());
        assert!(fx.deploy_lock("apps/broken").is_err());
    }

    #[tokio::test]
    async fn no_targets_is_a_quiet_success() {
        let fx = Fixture::new(
            "[package]\nname = \"root\"\nversion = \"0.1.0\"\n\n[workspace]\nmembers = [\"apps/*\"]\ndeploy = []\n",
            INDEX,
        );
        fx.workspace("apps/web", "[package]\nname = \"web\"\nversion = \"1.0.0\"\n");
        let (project, cache) = fx.load();

        let outcome = generate_deploy_lockfiles(project, cache, Arc::new(MemoryReport::new()))
            .await
            .unwrap();

        assert_eq!(outcome.targets(), 0);
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn sibling_deploy_references_stay_project_relative() {
        let fx = Fixture::new(ROOT, INDEX);
        fx.workspace(
            "apps/web",
            "[package]\nname = \"web\"\nversion = \"1.0.0\"\n\n[dependencies]\napi = \"workspace:apps/api\"\n",
        )
        .workspace("apps/api", "[package]\nname = \"api\"\nversion = \"1.1.0\"\n");
        let (project, cache) = fx.load();

        generate_deploy_lockfiles(project, cache, Arc::new(MemoryReport::new()))
            .await
            .unwrap();

        let web = fx.deploy_lock("apps/web").unwrap();
        assert!(web.contains("resolution = \"api@workspace:apps/api\""));

        let api = fx.deploy_lock("apps/api").unwrap();
        assert!(api.contains("resolution = \"api@workspace:.\""));
    }
}
