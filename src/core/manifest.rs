//! Manifest (wharf.toml) parsing
//!
//! Every workspace directory carries a `wharf.toml`. The project root's
//! manifest additionally has a `[workspace]` table declaring member globs
//! and, optionally, which members are deployment targets.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ProjectError;

/// A parsed wharf.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Manifest {
    /// Package identity
    pub package: PackageConfig,

    /// Workspace declaration; present only in the project root manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<WorkspaceConfig>,

    /// Dependency ranges, keyed by package name.
    ///
    /// A range is either a semver requirement (`"^2"`, `"1.*"`, `"*"`) or a
    /// workspace reference (`"workspace:libs/shared"`, `"workspace:*"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

/// Package identity in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PackageConfig {
    /// Package name
    pub name: String,

    /// Package version
    #[serde(default = "default_version")]
    pub version: String,

    /// Package description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

/// Workspace declaration in the root manifest
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Member discovery globs, in declaration order
    #[serde(default)]
    pub members: Vec<String>,

    /// Deployment target globs; defaults to `members` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<Vec<String>>,
}

impl WorkspaceConfig {
    /// The deployment patterns in effect for this root
    pub fn deploy_patterns(&self) -> &[String] {
        self.deploy.as_deref().unwrap_or(&self.members)
    }
}

impl Manifest {
    /// Parse from TOML string
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a manifest from a file path
    pub fn load(path: &Path) -> Result<Self, ProjectError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProjectError::ManifestRead {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content).map_err(|e| ProjectError::ManifestParse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Whether this manifest declares the project root
    pub fn is_root(&self) -> bool {
        self.workspace.is_some()
    }
}
