//! Command-line interface module
//!
//! This module handles argument parsing and output formatting.
//! It contains no business logic - that belongs in the [`crate::core`] module.

pub mod commands;
pub mod output;

use anyhow::Result;
use clap::Parser;

use commands::Commands;

/// Version string with build metadata, shown by `wharf --version`
const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_SHA"),
    ", ",
    env!("VERGEN_BUILD_TIMESTAMP"),
    ", rustc ",
    env!("VERGEN_RUSTC_SEMVER"),
    ")"
);

/// Wharf - Deployment lockfiles for multi-workspace projects
///
/// Resolve workspace dependency graphs against a shared package cache and
/// keep a scoped, portable lockfile in every deployable workspace.
#[derive(Parser, Debug)]
#[command(name = "wharf")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Run as if started in this directory
    #[arg(long, global = true, value_name = "DIR")]
    pub path: Option<std::path::PathBuf>,

    /// Use this package cache instead of the default location
    #[arg(long, global = true, value_name = "DIR", env = crate::config::defaults::CACHE_DIR_ENV)]
    pub cache_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        if let Some(cmd) = self.command {
            let start_dir = match self.path {
                Some(path) => path,
                None => std::env::current_dir()?,
            };
            cmd.run(&start_dir, self.cache_dir.as_deref()).await
        } else {
            // No subcommand provided, show help
            use clap::CommandFactory;
            let mut cmd = Self::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
