//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod init;
pub mod install;
pub mod lock;
pub mod targets;

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve all workspaces and refresh every lockfile
    Install,

    /// Regenerate deploy lockfiles without touching the project lockfile
    Lock,

    /// List the deploy targets this invocation would generate for
    Targets,

    /// Initialize a new wharf project
    Init {
        /// Package name for the root manifest (defaults to the directory name)
        #[arg(short, long)]
        name: Option<String>,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self, start_dir: &Path, cache_override: Option<&Path>) -> Result<()> {
        match self {
            Self::Install => install::execute(start_dir, cache_override).await,
            Self::Lock => lock::execute(start_dir, cache_override).await,
            Self::Targets => targets::execute(start_dir).await,
            Self::Init { name } => init::execute(start_dir, name).await,
        }
    }
}
