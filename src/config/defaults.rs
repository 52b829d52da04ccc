//! Default configuration values

/// Manifest file name looked up in every workspace directory
pub const MANIFEST_FILE_NAME: &str = "wharf.toml";

/// Whole-project lockfile written at the project root
pub const PROJECT_LOCKFILE_NAME: &str = "wharf.lock";

/// Scoped lockfile written at each deployment target's root
pub const DEPLOY_LOCKFILE_NAME: &str = "wharf.deploy.lock";

/// Range/reference prefix marking a workspace dependency
pub const WORKSPACE_PROTOCOL: &str = "workspace:";

/// Canonical self-reference marker written into scoped lockfiles
pub const SELF_REFERENCE: &str = "workspace:.";

/// Relative path of the root workspace
pub const ROOT_WORKSPACE_PATH: &str = ".";

/// Lockfile format version
pub const LOCKFILE_VERSION: u32 = 1;

/// Directory name under the user cache dir holding the shared package cache
pub const CACHE_DIR_NAME: &str = "wharf";

/// Index file describing the packages available in the cache
pub const CACHE_INDEX_FILE_NAME: &str = "index.toml";

/// Environment variable overriding the shared package cache location
pub const CACHE_DIR_ENV: &str = "WHARF_CACHE_DIR";
