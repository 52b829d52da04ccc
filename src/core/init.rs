//! Project scaffolding

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::defaults::MANIFEST_FILE_NAME;
use crate::core::manifest::{Manifest, PackageConfig, WorkspaceConfig};
use crate::error::{ProjectError, WharfError};
use crate::infra::filesystem;

/// Create a root manifest in `dir`.
///
/// Refuses to touch a directory that already carries a manifest; `init`
/// never overwrites existing configuration.
pub fn init_project(dir: &Path, name: &str) -> Result<PathBuf, WharfError> {
    validate_package_name(name)?;

    let path = dir.join(MANIFEST_FILE_NAME);
    if path.exists() {
        return Err(ProjectError::AlreadyInitialized { path }.into());
    }

    let manifest = Manifest {
        package: PackageConfig {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            description: None,
        },
        workspace: Some(WorkspaceConfig::default()),
        dependencies: BTreeMap::new(),
    };
    let content = manifest.to_toml().map_err(|e| ProjectError::ManifestSerialize {
        error: e.to_string(),
    })?;
    filesystem::write_file(&path, &content)?;

    tracing::info!(path = %path.display(), "created root manifest");
    Ok(path)
}

/// Package names are lowercase, start with a letter, and use `-` or `_`
/// between alphanumerics.
fn validate_package_name(name: &str) -> Result<(), ProjectError> {
    let invalid = |reason: &str| ProjectError::InvalidPackageName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(invalid("must start with a lowercase letter"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(invalid(
            "only lowercase letters, digits, '-' and '_' are allowed",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_a_loadable_root_manifest() {
        let dir = tempfile::tempdir().unwrap();

        let path = init_project(dir.path(), "shop").unwrap();
        let manifest = Manifest::load(&path).unwrap();

        assert!(manifest.is_root());
        assert_eq!(manifest.package.name, "shop");
        assert_eq!(manifest.package.version, "0.1.0");
        assert!(manifest.workspace.is_some_and(|ws| ws.members.is_empty()));
    }

    #[test]
    fn refuses_to_overwrite_an_existing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        init_project(dir.path(), "shop").unwrap();

        let err = init_project(dir.path(), "shop").unwrap_err();

        assert!(matches!(
            err,
            WharfError::Project(ProjectError::AlreadyInitialized { .. })
        ));
    }

    #[test]
    fn rejects_names_that_do_not_fit_the_format() {
        let dir = tempfile::tempdir().unwrap();

        for bad in ["", "9lives", "Shop", "my shop", "shop!"] {
            let err = init_project(dir.path(), bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    WharfError::Project(ProjectError::InvalidPackageName { .. })
                ),
                "expected rejection for {bad:?}"
            );
        }
    }
}
