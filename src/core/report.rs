//! Per-target status reporting
//!
//! Deploy lockfile generation fans out across targets, and each target owes
//! the user exactly one status line. The [`Report`] trait decouples that from
//! the console so the generator can run under tests (and future embedders)
//! without printing.

use std::sync::Mutex;

use crate::config::defaults::DEPLOY_LOCKFILE_NAME;

/// Sink for per-target status lines
pub trait Report: Send + Sync {
    /// The target's lockfile was (re)written
    fn lockfile_updated(&self, target: &str);

    /// The target's lockfile already matched on disk
    fn lockfile_unchanged(&self, target: &str);

    /// The target failed; other targets keep running
    fn lockfile_failed(&self, target: &str, error: &str);
}

/// A [`Report`] that collects lines in memory
#[derive(Debug, Default)]
pub struct MemoryReport {
    lines: Mutex<Vec<String>>,
}

impl MemoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected lines
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Report for MemoryReport {
    fn lockfile_updated(&self, target: &str) {
        self.push(format!("{target}: Writing {DEPLOY_LOCKFILE_NAME}"));
    }

    fn lockfile_unchanged(&self, target: &str) {
        self.push(format!("{target}: No change"));
    }

    fn lockfile_failed(&self, target: &str, error: &str) {
        self.push(format!("{target}: {error}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_report_collects_lines_in_order() {
        let report = MemoryReport::new();

        report.lockfile_updated("web");
        report.lockfile_unchanged("api");

        assert_eq!(
            report.lines(),
            ["web: Writing wharf.deploy.lock", "api: No change"]
        );
    }
}
