//! Lockfile serialization and persistence
//!
//! A lockfile is a TOML document with one entry per resolved descriptor,
//! keyed `<name>@<range>` and carrying the pinned version, the resolution
//! identity, the release checksum for registry packages, and the dependency
//! ranges of the resolved package. Entries live in a `BTreeMap`, so the
//! serialized bytes are a pure function of the resolved graph: same graph,
//! same bytes, on every platform.
//!
//! Persistence goes through [`Lockfile::write_if_changed`], which leaves the
//! file completely untouched when nothing changed. Tools that watch the
//! lockfile (image builders, CI caches) rely on the mtime staying put.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::config::defaults::LOCKFILE_VERSION;
use crate::core::resolver::ResolvedGraph;
use crate::error::LockfileError;

const HEADER: &str =
    "# This file is generated by wharf.\n# Manual edits will be overwritten on the next install.\n";

/// One lockfile entry, keyed by its descriptor
#[derive(Debug, Clone, Serialize)]
pub struct LockfileEntry {
    pub version: String,
    pub resolution: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, String>,
}

#[derive(Serialize)]
struct LockfileDoc<'a> {
    version: u32,
    entries: &'a BTreeMap<String, LockfileEntry>,
}

/// Result of a [`Lockfile::write_if_changed`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The file was missing or its content differed; new bytes were written
    Updated,
    /// On-disk bytes already match; nothing was touched
    Unchanged,
}

/// A deterministic lockfile built from a resolved graph
#[derive(Debug, Clone, Default)]
pub struct Lockfile {
    entries: BTreeMap<String, LockfileEntry>,
}

impl Lockfile {
    /// Build lockfile entries from a resolved graph.
    ///
    /// Every resolution contributes one entry under its descriptor key; the
    /// entry body comes from the package record the descriptor bound to.
    pub fn from_graph(graph: &ResolvedGraph) -> Self {
        let mut records = BTreeMap::new();
        for record in &graph.records {
            records.insert(record.resolution(), record);
        }

        let mut entries = BTreeMap::new();
        for resolution in &graph.resolutions {
            let identity = format!("{}@{}", resolution.descriptor.name, resolution.reference);
            if let Some(record) = records.get(&identity) {
                entries.insert(
                    resolution.descriptor.to_string(),
                    LockfileEntry {
                        version: record.version.clone(),
                        resolution: record.resolution(),
                        checksum: record.checksum.clone(),
                        dependencies: record.dependencies.clone(),
                    },
                );
            }
        }
        Self { entries }
    }

    pub fn entries(&self) -> &BTreeMap<String, LockfileEntry> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize to the exact bytes that belong on disk
    pub fn to_bytes(&self) -> Result<Vec<u8>, LockfileError> {
        let doc = LockfileDoc {
            version: LOCKFILE_VERSION,
            entries: &self.entries,
        };
        let body = toml::to_string_pretty(&doc).map_err(|e| LockfileError::Serialize {
            error: e.to_string(),
        })?;

        let mut out = String::with_capacity(HEADER.len() + body.len() + 1);
        out.push_str(HEADER);
        out.push('\n');
        out.push_str(&body);
        Ok(out.into_bytes())
    }

    /// Write the lockfile only if the on-disk bytes differ.
    ///
    /// The on-disk length is checked first; a mismatch settles the question
    /// without reading the file. A missing or unreadable file counts as
    /// different and gets regenerated. Writes go through a temp file in the
    /// same directory followed by a rename, so the lockfile is never
    /// observable half-written.
    pub fn write_if_changed(&self, path: &Path) -> Result<WriteOutcome, LockfileError> {
        let new_bytes = self.to_bytes()?;

        let same_length = std::fs::metadata(path)
            .is_ok_and(|meta| meta.len() == new_bytes.len() as u64);
        if same_length && std::fs::read(path).is_ok_and(|current| current == new_bytes) {
            return Ok(WriteOutcome::Unchanged);
        }

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let write_err = |e: String| LockfileError::Write {
            path: path.to_path_buf(),
            error: e,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| write_err(e.to_string()))?;
        tmp.write_all(&new_bytes)
            .map_err(|e| write_err(e.to_string()))?;
        tmp.persist(path).map_err(|e| write_err(e.to_string()))?;

        Ok(WriteOutcome::Updated)
    }
}
