//! Project discovery and the workspace list
//!
//! A project is rooted at the nearest ancestor manifest with a `[workspace]`
//! table. Member globs from that table are expanded against the directory
//! tree to the full workspace list; the list keeps declaration order (root
//! first, then each member pattern in turn, lexicographic within a pattern)
//! because target selection and reporting preserve it.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};
use walkdir::WalkDir;

use crate::config::defaults::MANIFEST_FILE_NAME;
use crate::core::manifest::Manifest;
use crate::core::select::DeployPatterns;
use crate::core::workspace::{portable_rel_path, Workspace};
use crate::error::{ConfigError, ProjectError, WharfError};

/// A loaded project: the root plus every member workspace
#[derive(Debug)]
pub struct Project {
    root_dir: PathBuf,
    workspaces: Vec<Workspace>,
    starting: usize,
}

impl Project {
    /// Locate and load the project containing `start_dir`.
    ///
    /// Walks up from `start_dir` until a manifest with a `[workspace]` table
    /// is found, then expands the member globs. The starting workspace is
    /// the deepest workspace whose directory contains `start_dir`; for a
    /// plain subdirectory that is the root workspace itself.
    pub fn find(start_dir: &Path) -> Result<Self, WharfError> {
        let start = std::fs::canonicalize(start_dir).map_err(|source| WharfError::Io { source })?;

        let (root_dir, root_manifest) = locate_root(&start)?;
        tracing::debug!(root = %root_dir.display(), "located project root");

        let workspaces = discover_workspaces(&root_dir, root_manifest)?;
        check_unique_names(&workspaces)?;

        let starting = workspaces
            .iter()
            .enumerate()
            .filter(|(_, ws)| start.starts_with(ws.dir()))
            .max_by_key(|(_, ws)| ws.dir().components().count())
            .map(|(i, _)| i)
            .ok_or(ProjectError::OutsideProject {
                path: start.clone(),
            })?;

        tracing::debug!(
            workspaces = workspaces.len(),
            starting = workspaces[starting].rel_path(),
            "loaded project"
        );

        Ok(Self {
            root_dir,
            workspaces,
            starting,
        })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// All workspaces in declaration order, root first
    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces
    }

    pub fn root_workspace(&self) -> &Workspace {
        &self.workspaces[0]
    }

    /// The workspace the command was invoked from
    pub fn starting_workspace(&self) -> &Workspace {
        &self.workspaces[self.starting]
    }

    pub fn workspace_by_path(&self, rel_path: &str) -> Option<&Workspace> {
        self.workspaces.iter().find(|ws| ws.rel_path() == rel_path)
    }

    /// Compile the root manifest's deploy patterns.
    ///
    /// This runs before any resolution so a malformed pattern fails the whole
    /// command up front.
    pub fn deploy_patterns(&self) -> Result<DeployPatterns, ConfigError> {
        let manifest = self.root_workspace().manifest();
        let patterns = manifest
            .workspace
            .as_ref()
            .map_or(&[][..], |ws| ws.deploy_patterns());
        DeployPatterns::compile(patterns)
    }

    /// Resolve the deploy targets for this invocation.
    ///
    /// From a non-root workspace selection is bypassed entirely: the target
    /// set is that workspace, and the deploy patterns are never compiled, so
    /// a malformed pattern in the root manifest cannot fail a run scoped to
    /// a member workspace. Root invocations compile the patterns first and
    /// fail fast on a bad one.
    pub fn deploy_targets(&self) -> Result<Vec<&Workspace>, ConfigError> {
        let starting = self.starting_workspace();
        if !starting.is_root() {
            tracing::debug!(
                workspace = starting.rel_path(),
                "running from a non-root workspace, deploy patterns ignored"
            );
            return Ok(vec![starting]);
        }

        let patterns = self.deploy_patterns()?;
        Ok(patterns.select(&self.workspaces))
    }
}

fn locate_root(start: &Path) -> Result<(PathBuf, Manifest), WharfError> {
    let mut dir = start;
    loop {
        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        if manifest_path.is_file() {
            let manifest = Manifest::load(&manifest_path)?;
            if manifest.is_root() {
                return Ok((dir.to_path_buf(), manifest));
            }
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                return Err(ProjectError::RootNotFound {
                    path: start.to_path_buf(),
                }
                .into())
            }
        }
    }
}

fn compile_member_patterns(patterns: &[String]) -> Result<Vec<GlobMatcher>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map(|glob| glob.compile_matcher())
                .map_err(|e| ConfigError::InvalidMemberPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn discover_workspaces(
    root_dir: &Path,
    root_manifest: Manifest,
) -> Result<Vec<Workspace>, WharfError> {
    let member_patterns = root_manifest
        .workspace
        .as_ref()
        .map(|ws| ws.members.clone())
        .unwrap_or_default();
    let matchers = compile_member_patterns(&member_patterns)?;

    // Directories under the root that carry a manifest, as portable relative
    // paths. Hidden directories are not walked.
    let mut candidates: Vec<String> = Vec::new();
    let walker = WalkDir::new(root_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !name.starts_with('.'))
        });
    for entry in walker.filter_map(Result::ok) {
        if !entry.file_type().is_dir() {
            continue;
        }
        if !entry.path().join(MANIFEST_FILE_NAME).is_file() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(root_dir) {
            candidates.push(portable_rel_path(rel));
        }
    }
    candidates.sort();

    let root_workspace = Workspace::new(".".to_string(), root_dir.to_path_buf(), root_manifest);
    let mut workspaces = vec![root_workspace];
    let mut seen: BTreeSet<String> = BTreeSet::from([".".to_string()]);

    for matcher in &matchers {
        for rel in &candidates {
            if matcher.is_match(rel.as_str()) && seen.insert(rel.clone()) {
                let dir = root_dir.join(rel);
                let manifest = Manifest::load(&dir.join(MANIFEST_FILE_NAME))?;
                workspaces.push(Workspace::new(rel.clone(), dir, manifest));
            }
        }
    }

    Ok(workspaces)
}

fn check_unique_names(workspaces: &[Workspace]) -> Result<(), ProjectError> {
    let mut by_name: BTreeMap<&str, &str> = BTreeMap::new();
    for ws in workspaces {
        if let Some(first) = by_name.insert(ws.name(), ws.rel_path()) {
            return Err(ProjectError::DuplicateWorkspaceName {
                name: ws.name().to_string(),
                first: first.to_string(),
                second: ws.rel_path().to_string(),
            });
        }
    }
    Ok(())
}
