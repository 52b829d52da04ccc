//! Output formatting
//!
//! This module owns everything the user sees on stdout/stderr: status
//! glyphs, quiet and JSON modes, and the console [`Report`] that streams
//! per-target lockfile lines as tasks finish. Commands print through these
//! helpers instead of calling `println!` directly so the global flags apply
//! everywhere.

use std::sync::OnceLock;

use crate::config::defaults::DEPLOY_LOCKFILE_NAME;
use crate::core::report::Report;

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";
}

static OUTPUT: OnceLock<OutputConfig> = OnceLock::new();

/// Global output flags, set once at startup
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
}

impl OutputConfig {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Install this configuration for the process
    pub fn apply_global(self) {
        let _ = OUTPUT.set(self);
    }

    pub fn global() -> Self {
        OUTPUT.get().copied().unwrap_or_default()
    }
}

/// Print a success line, suppressed by `--quiet` and `--json`
pub fn success(message: &str) {
    let config = OutputConfig::global();
    if !config.quiet && !config.json {
        println!("{} {message}", status::SUCCESS);
    }
}

/// Print an indented secondary line, suppressed by `--quiet` and `--json`
pub fn detail(message: &str) {
    let config = OutputConfig::global();
    if !config.quiet && !config.json {
        println!("  {message}");
    }
}

/// Print a warning line, suppressed by `--quiet` and `--json`
pub fn warning(message: &str) {
    let config = OutputConfig::global();
    if !config.quiet && !config.json {
        println!("{} {message}", status::WARNING);
    }
}

/// Print a failure line to stderr; shown even under `--quiet`
pub fn failure(message: &str) {
    if OutputConfig::global().json {
        emit_json(&serde_json::json!({ "event": "error", "message": message }));
    } else {
        eprintln!("{} {message}", status::ERROR);
    }
}

/// Print one JSON value per line for scripting
pub fn emit_json(value: &serde_json::Value) {
    println!("{value}");
}

/// Display a top-level error and its cause chain
pub fn display_error(error: &anyhow::Error) {
    if OutputConfig::global().json {
        emit_json(&serde_json::json!({
            "event": "error",
            "message": format!("{error:#}"),
        }));
    } else {
        eprintln!("{} Error: {error:#}", status::ERROR);
    }
}

/// Streams per-target lockfile status to the console
pub struct ConsoleReport;

impl Report for ConsoleReport {
    fn lockfile_updated(&self, target: &str) {
        let config = OutputConfig::global();
        if config.json {
            emit_json(&serde_json::json!({
                "event": "lockfile",
                "target": target,
                "status": "updated",
                "file": DEPLOY_LOCKFILE_NAME,
            }));
        } else if !config.quiet {
            println!("{} {target}: Writing {DEPLOY_LOCKFILE_NAME}", status::SUCCESS);
        }
    }

    fn lockfile_unchanged(&self, target: &str) {
        let config = OutputConfig::global();
        if config.json {
            emit_json(&serde_json::json!({
                "event": "lockfile",
                "target": target,
                "status": "unchanged",
            }));
        } else if !config.quiet {
            println!("  {target}: No change");
        }
    }

    fn lockfile_failed(&self, target: &str, error: &str) {
        let config = OutputConfig::global();
        if config.json {
            emit_json(&serde_json::json!({
                "event": "lockfile",
                "target": target,
                "status": "failed",
                "error": error,
            }));
        } else {
            eprintln!("{} {target}: {error}", status::ERROR);
        }
    }
}
