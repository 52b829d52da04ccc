//! Deploy target selection
//!
//! Deploy patterns are globs matched against workspace relative paths
//! (`apps/*`, `services/**`). Patterns are compiled up front so a typo fails
//! the whole run before any resolution work starts. Compilation and selection
//! only happen for root invocations; a run scoped to a member workspace
//! targets that workspace alone and never looks at the patterns.

use globset::{GlobBuilder, GlobMatcher};

use crate::core::workspace::Workspace;
use crate::error::ConfigError;

/// Compiled deploy patterns
#[derive(Debug)]
pub struct DeployPatterns {
    matchers: Vec<GlobMatcher>,
}

impl DeployPatterns {
    /// Compile a pattern list, failing on the first invalid glob
    pub fn compile(patterns: &[String]) -> Result<Self, ConfigError> {
        let mut matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            // `*` must not cross path segments, so `apps/*` selects direct
            // children only while `apps/**` selects the whole subtree.
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidDeployPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })?;
            matchers.push(glob.compile_matcher());
        }
        Ok(Self { matchers })
    }

    /// Whether any pattern matches the given workspace path
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(rel_path))
    }

    /// Select deploy targets from the project's workspaces.
    ///
    /// Filters `workspaces` by the patterns, preserving declaration order;
    /// each workspace appears at most once no matter how many patterns match
    /// it.
    pub fn select<'a>(&self, workspaces: &'a [Workspace]) -> Vec<&'a Workspace> {
        let selected: Vec<&Workspace> = workspaces
            .iter()
            .filter(|ws| self.matches(ws.rel_path()))
            .collect();

        tracing::debug!(
            patterns = self.matchers.len(),
            selected = selected.len(),
            "selected deploy targets"
        );
        selected
    }
}
