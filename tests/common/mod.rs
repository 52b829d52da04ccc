//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests.

use std::path::PathBuf;
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up workspace and cache fixtures.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    #[allow(dead_code)]
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    #[allow(dead_code)]
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    #[allow(dead_code)]
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }

    /// Create a workspace directory with a manifest
    #[allow(dead_code)]
    pub fn create_workspace(&self, rel: &str, manifest: &str) {
        self.create_file(&format!("{rel}/wharf.toml"), manifest);
    }

    /// Write a package cache index under a hidden directory
    ///
    /// The directory is hidden so workspace discovery never walks into it.
    #[allow(dead_code)]
    pub fn create_cache_index(&self, content: &str) {
        self.create_file(".cache/index.toml", content);
    }

    /// Absolute path of the test cache, for `--cache-dir`
    #[allow(dead_code)]
    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join(".cache")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Root manifest with two member groups, deploying the apps group
#[allow(dead_code)]
pub const SAMPLE_ROOT_MANIFEST: &str = r#"[package]
name = "acme"
version = "0.1.0"

[workspace]
members = ["apps/*", "libs/*"]
deploy = ["apps/*"]
"#;

/// Deployable workspace depending on a sibling library and a registry package
#[allow(dead_code)]
pub const SAMPLE_WEB_MANIFEST: &str = r#"[package]
name = "web"
version = "1.0.0"

[dependencies]
shared = "workspace:libs/shared"
lodash = "^4.17.0"
"#;

/// Library workspace depending on a registry package
#[allow(dead_code)]
pub const SAMPLE_SHARED_MANIFEST: &str = r#"[package]
name = "shared"
version = "2.0.0"

[dependencies]
lodash = "^4.17.0"
"#;

/// Package cache index with two lodash releases
#[allow(dead_code)]
pub const SAMPLE_CACHE_INDEX: &str = r#"[packages.lodash."4.17.19"]
checksum = "sha512-older"

[packages.lodash."4.17.21"]
checksum = "sha512-newer"
"#;
