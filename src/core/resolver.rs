//! Dependency resolution
//!
//! Walks the dependency closure of a set of active workspaces and produces a
//! [`ResolvedGraph`]: one package record per resolved package plus one
//! resolution per descriptor encountered along the way. Workspace ranges are
//! answered from the project's workspace map, registry ranges from the shared
//! package cache. The cache is never mutated; a range no cached release
//! satisfies is a hard error, not a download trigger.
//!
//! The active set only decides where the walk starts. Workspace lookup always
//! sees the full workspace map, so a restricted view still resolves sibling
//! workspaces reached through dependency edges.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use semver::VersionReq;

use crate::cache::PackageCache;
use crate::config::defaults::WORKSPACE_PROTOCOL;
use crate::core::workspace::Workspace;
use crate::error::ResolveError;

/// A dependency request: a package name plus the range asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub range: String,
}

impl Descriptor {
    pub fn new(name: &str, range: &str) -> Self {
        Self {
            name: name.to_string(),
            range: range.to_string(),
        }
    }
}

/// Renders the canonical `<name>@<range>` form, also the lockfile entry key
impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}

/// A resolved package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: String,
    /// `workspace:<rel-path>` for workspaces, the pinned version for
    /// registry packages
    pub reference: String,
    pub checksum: Option<String>,
    /// Dependency ranges as declared by this package
    pub dependencies: BTreeMap<String, String>,
}

impl PackageRecord {
    /// Stable `<name>@<reference>` identity
    pub fn resolution(&self) -> String {
        format!("{}@{}", self.name, self.reference)
    }

    pub fn is_workspace(&self) -> bool {
        self.reference.starts_with(WORKSPACE_PROTOCOL)
    }
}

/// One descriptor bound to the reference that satisfied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub descriptor: Descriptor,
    pub reference: String,
}

/// Outcome of a resolution pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedGraph {
    pub records: Vec<PackageRecord>,
    pub resolutions: Vec<Resolution>,
}

/// Resolves descriptors against the workspace map and the package cache
pub struct Resolver<'a> {
    by_path: BTreeMap<String, &'a Workspace>,
    by_name: BTreeMap<String, &'a Workspace>,
    cache: &'a PackageCache,
}

impl<'a> Resolver<'a> {
    /// Build a resolver over the full workspace list
    pub fn new(workspaces: &'a [Workspace], cache: &'a PackageCache) -> Self {
        let mut by_path = BTreeMap::new();
        let mut by_name = BTreeMap::new();
        for ws in workspaces {
            by_path.insert(ws.rel_path().to_string(), ws);
            by_name.insert(ws.name().to_string(), ws);
        }
        Self {
            by_path,
            by_name,
            cache,
        }
    }

    /// Resolve the full dependency closure of the active workspaces
    pub fn resolve(&self, active: &[&Workspace]) -> Result<ResolvedGraph, ResolveError> {
        let mut graph = ResolvedGraph::default();
        let mut seen_descriptors = BTreeSet::new();
        let mut seen_records = BTreeSet::new();

        let mut queue: VecDeque<Descriptor> = active
            .iter()
            .map(|ws| Descriptor::new(ws.name(), &ws.reference()))
            .collect();

        while let Some(descriptor) = queue.pop_front() {
            if !seen_descriptors.insert(descriptor.to_string()) {
                continue;
            }

            let record = self.resolve_descriptor(&descriptor)?;
            graph.resolutions.push(Resolution {
                descriptor,
                reference: record.reference.clone(),
            });

            if seen_records.insert(record.resolution()) {
                for (dep_name, dep_range) in &record.dependencies {
                    queue.push_back(Descriptor::new(dep_name, dep_range));
                }
                graph.records.push(record);
            }
        }

        tracing::debug!(
            packages = graph.records.len(),
            descriptors = graph.resolutions.len(),
            "resolved dependency graph"
        );
        Ok(graph)
    }

    fn resolve_descriptor(&self, descriptor: &Descriptor) -> Result<PackageRecord, ResolveError> {
        if let Some(target) = descriptor.range.strip_prefix(WORKSPACE_PROTOCOL) {
            let ws = self
                .lookup_workspace(&descriptor.name, target)
                .ok_or_else(|| ResolveError::UnknownWorkspace {
                    name: descriptor.name.clone(),
                    range: descriptor.range.clone(),
                })?;
            return Ok(Self::workspace_record(ws));
        }
        self.cached_record(descriptor)
    }

    /// Look up a workspace range target: a relative path, or `*` for a
    /// lookup by package name.
    fn lookup_workspace(&self, name: &str, target: &str) -> Option<&'a Workspace> {
        let ws = if target == "*" {
            self.by_name.get(name)?
        } else {
            self.by_path.get(target)?
        };
        (ws.name() == name).then_some(*ws)
    }

    fn workspace_record(ws: &Workspace) -> PackageRecord {
        PackageRecord {
            name: ws.name().to_string(),
            version: ws.version().to_string(),
            reference: ws.reference(),
            checksum: None,
            dependencies: ws.manifest().dependencies.clone(),
        }
    }

    fn cached_record(&self, descriptor: &Descriptor) -> Result<PackageRecord, ResolveError> {
        let req = VersionReq::parse(&descriptor.range).map_err(|e| ResolveError::InvalidRange {
            name: descriptor.name.clone(),
            range: descriptor.range.clone(),
            reason: e.to_string(),
        })?;

        let releases =
            self.cache
                .releases(&descriptor.name)
                .ok_or_else(|| ResolveError::UnknownPackage {
                    name: descriptor.name.clone(),
                })?;

        // Releases are sorted ascending, so the first match from the back is
        // the highest satisfying version.
        let Some((version, release)) = releases.iter().rev().find(|(v, _)| req.matches(v)) else {
            let available = releases
                .iter()
                .map(|(v, _)| v.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ResolveError::NoMatchingVersion {
                name: descriptor.name.clone(),
                range: descriptor.range.clone(),
                available,
            });
        };

        Ok(PackageRecord {
            name: descriptor.name.clone(),
            version: version.to_string(),
            reference: version.to_string(),
            checksum: release.checksum.clone(),
            dependencies: release.dependencies.clone(),
        })
    }
}
