//! Error types for wharf
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
///
/// All of these surface before any per-target resolution work starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Malformed deployment glob pattern
    #[error("Invalid deployment pattern '{pattern}': {reason}")]
    InvalidDeployPattern { pattern: String, reason: String },

    /// Malformed workspace member glob pattern
    #[error("Invalid workspace member pattern '{pattern}': {reason}")]
    InvalidMemberPattern { pattern: String, reason: String },
}

/// Project loading errors
#[derive(Error, Debug)]
pub enum ProjectError {
    /// No root manifest found walking up from the starting directory
    #[error("No wharf.toml with a [workspace] table found above '{path}'. Run 'wharf init' at the project root first.")]
    RootNotFound { path: PathBuf },

    /// Manifest could not be read
    #[error("Failed to read manifest '{path}': {error}")]
    ManifestRead { path: PathBuf, error: String },

    /// Manifest could not be parsed
    #[error("Failed to parse manifest '{path}': {error}")]
    ManifestParse { path: PathBuf, error: String },

    /// Manifest could not be serialized
    #[error("Failed to serialize manifest: {error}")]
    ManifestSerialize { error: String },

    /// The starting directory does not belong to any workspace
    #[error("'{path}' is not inside any workspace of this project")]
    OutsideProject { path: PathBuf },

    /// Two workspaces declare the same package name
    #[error("Workspaces '{first}' and '{second}' both declare package name '{name}'")]
    DuplicateWorkspaceName {
        name: String,
        first: String,
        second: String,
    },

    /// `init` ran where a manifest already exists
    #[error("'{path}' already exists, refusing to overwrite it")]
    AlreadyInitialized { path: PathBuf },

    /// Package name does not fit the manifest format
    #[error("Invalid package name '{name}': {reason}")]
    InvalidPackageName { name: String, reason: String },
}

/// Dependency resolution errors
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A dependency range could not be parsed as a semver requirement
    #[error("Invalid version range '{range}' for dependency '{name}': {reason}")]
    InvalidRange {
        name: String,
        range: String,
        reason: String,
    },

    /// A workspace range names no workspace of the project
    #[error("Dependency '{name}' range '{range}' does not match any workspace")]
    UnknownWorkspace { name: String, range: String },

    /// The package cache has no entry for this package at all
    #[error("Package '{name}' not found in the package cache")]
    UnknownPackage { name: String },

    /// The package cache has versions, but none satisfying the range
    #[error("No cached version of '{name}' satisfies '{range}' (available: {available})")]
    NoMatchingVersion {
        name: String,
        range: String,
        available: String,
    },
}

/// Package cache errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache index could not be read
    #[error("Failed to read cache index '{path}': {error}")]
    IndexRead { path: PathBuf, error: String },

    /// Cache index could not be parsed
    #[error("Failed to parse cache index '{path}': {error}")]
    IndexParse { path: PathBuf, error: String },
}

/// Lockfile serialization and persistence errors
#[derive(Error, Debug)]
pub enum LockfileError {
    /// Resolved graph could not be serialized
    #[error("Failed to serialize lockfile: {error}")]
    Serialize { error: String },

    /// New lockfile content could not be written
    #[error("Failed to write lockfile '{path}': {error}")]
    Write { path: PathBuf, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },
}

/// Top-level wharf error type
#[derive(Error, Debug)]
pub enum WharfError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Project error
    #[error("Project error: {0}")]
    Project(#[from] ProjectError),

    /// Resolution error
    #[error("Resolution error: {0}")]
    Resolve(#[from] ResolveError),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Lockfile error
    #[error("Lockfile error: {0}")]
    Lockfile(#[from] LockfileError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// IO error
    #[error("IO error: {source}")]
    Io { source: std::io::Error },
}
