//! Workspace model
//!
//! A workspace is a project subdirectory with its own manifest. Its identity
//! is its relative path from the project root, kept as a portable
//! `/`-separated string so references and lockfile bytes are identical on
//! every platform. The root workspace's path is `"."`.

use std::path::{Path, PathBuf};

use crate::config::defaults::{DEPLOY_LOCKFILE_NAME, ROOT_WORKSPACE_PATH, WORKSPACE_PROTOCOL};
use crate::core::manifest::Manifest;

/// A workspace of the project
#[derive(Debug, Clone)]
pub struct Workspace {
    /// Relative path from the project root, portable form
    rel_path: String,

    /// Absolute directory of the workspace
    dir: PathBuf,

    /// Parsed manifest
    manifest: Manifest,
}

impl Workspace {
    /// Create a workspace from its identity parts
    pub fn new(rel_path: String, dir: PathBuf, manifest: Manifest) -> Self {
        Self {
            rel_path,
            dir,
            manifest,
        }
    }

    /// Relative path from the project root (`"."` for the root workspace)
    pub fn rel_path(&self) -> &str {
        &self.rel_path
    }

    /// Absolute workspace directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Parsed manifest
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Package name declared in the manifest
    pub fn name(&self) -> &str {
        &self.manifest.package.name
    }

    /// Package version declared in the manifest
    pub fn version(&self) -> &str {
        &self.manifest.package.version
    }

    /// Whether this is the project root workspace
    pub fn is_root(&self) -> bool {
        self.rel_path == ROOT_WORKSPACE_PATH
    }

    /// Workspace reference in the form `workspace:<rel-path>`
    pub fn reference(&self) -> String {
        workspace_reference(&self.rel_path)
    }

    /// Stable package identity, `<name>@workspace:<rel-path>`
    pub fn locator(&self) -> String {
        format!("{}@{}", self.name(), self.reference())
    }

    /// Where this workspace's scoped lockfile lives
    pub fn deploy_lockfile_path(&self) -> PathBuf {
        self.dir.join(DEPLOY_LOCKFILE_NAME)
    }
}

/// Build a `workspace:<rel-path>` reference string
pub fn workspace_reference(rel_path: &str) -> String {
    format!("{WORKSPACE_PROTOCOL}{rel_path}")
}

/// Convert a relative path to the portable `/`-separated form
pub fn portable_rel_path(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        ROOT_WORKSPACE_PATH.to_string()
    } else {
        parts.join("/")
    }
}
