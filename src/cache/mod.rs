//! Shared package cache
//!
//! The cache is a local, pre-populated directory describing every package
//! release available for resolution. wharf only ever consumes it: the index
//! is read once per run into an immutable snapshot, and the handle exposes
//! `&self` methods only, so concurrent per-target resolution tasks can share
//! one [`PackageCache`] without any mutation hazard.
//!
//! Layout: `<cache-dir>/index.toml` mapping package name → version →
//! checksum and dependency ranges. How entries get into the cache is out of
//! scope here; wharf never writes to this directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use semver::Version;
use serde::Deserialize;

use crate::config::defaults::{CACHE_DIR_ENV, CACHE_DIR_NAME, CACHE_INDEX_FILE_NAME};
use crate::error::CacheError;

/// One release of a package as recorded in the cache index
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CachedRelease {
    /// Integrity checksum recorded when the release was cached.
    /// Opaque to wharf; copied verbatim into lockfile entries.
    #[serde(default)]
    pub checksum: Option<String>,

    /// Dependency ranges this release was published with
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

/// On-disk shape of `index.toml`
#[derive(Debug, Default, Deserialize)]
struct CacheIndex {
    /// Package name → version string → release metadata
    #[serde(default)]
    packages: BTreeMap<String, BTreeMap<String, CachedRelease>>,
}

/// Read-only handle to the shared package cache
///
/// Opened once per run; every method takes `&self`.
#[derive(Debug)]
pub struct PackageCache {
    /// Immutable snapshot of the index, parsed versions sorted ascending
    releases: BTreeMap<String, Vec<(Version, CachedRelease)>>,
}

impl PackageCache {
    /// Open the cache at the given directory.
    ///
    /// A missing index file yields an empty cache: resolution will then fail
    /// per descriptor with `UnknownPackage` rather than here. Version strings
    /// that do not parse as semver are skipped with a warning so one bad
    /// entry cannot poison the whole run.
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        let index_path = dir.join(CACHE_INDEX_FILE_NAME);
        if !index_path.exists() {
            tracing::debug!("no cache index at {}, using empty cache", index_path.display());
            return Ok(Self {
                releases: BTreeMap::new(),
            });
        }

        let content = std::fs::read_to_string(&index_path).map_err(|e| CacheError::IndexRead {
            path: index_path.clone(),
            error: e.to_string(),
        })?;
        let index: CacheIndex = toml::from_str(&content).map_err(|e| CacheError::IndexParse {
            path: index_path.clone(),
            error: e.to_string(),
        })?;

        let mut releases = BTreeMap::new();
        for (name, versions) in index.packages {
            let mut parsed: Vec<(Version, CachedRelease)> = Vec::with_capacity(versions.len());
            for (version, release) in versions {
                match Version::parse(&version) {
                    Ok(v) => parsed.push((v, release)),
                    Err(e) => {
                        tracing::warn!("skipping cache entry {name}@{version}: {e}");
                    }
                }
            }
            parsed.sort_by(|a, b| a.0.cmp(&b.0));
            releases.insert(name, parsed);
        }

        Ok(Self { releases })
    }

    /// All cached releases of a package, sorted by ascending version
    pub fn releases(&self, name: &str) -> Option<&[(Version, CachedRelease)]> {
        self.releases.get(name).map(Vec::as_slice)
    }

    /// Whether any release of the package is cached
    pub fn contains(&self, name: &str) -> bool {
        self.releases
            .get(name)
            .is_some_and(|releases| !releases.is_empty())
    }
}

/// Resolve the cache directory: explicit flag, then `WHARF_CACHE_DIR`,
/// then the user cache dir.
pub fn cache_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(CACHE_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CACHE_DIR_NAME)
}
