//! Aggregation of per-file decisions into a run report.

use std::fmt;

use pack_blocks::ChangeStatus;
use serde::{Deserialize, Serialize};

/// The decision taken for one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyChange {
    pub path: String,
    pub status: ChangeStatus,
    /// Always present for skipped changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ApplyChange {
    pub fn new(path: impl Into<String>, status: ChangeStatus) -> Self {
        Self {
            path: path.into(),
            status,
            reason: None,
        }
    }

    pub fn skipped(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: ChangeStatus::Skipped,
            reason: Some(reason.into()),
        }
    }
}

/// Counts per change status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl ApplySummary {
    fn record(&mut self, status: ChangeStatus) {
        match status {
            ChangeStatus::Added => self.added += 1,
            ChangeStatus::Updated => self.updated += 1,
            ChangeStatus::Unchanged => self.unchanged += 1,
            ChangeStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.added + self.updated + self.unchanged + self.skipped
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "added={}, updated={}, unchanged={}, skipped={}",
            self.added, self.updated, self.unchanged, self.skipped
        )
    }
}

/// Report of one apply run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    /// One entry per input file, in processing order.
    pub changes: Vec<ApplyChange>,
    pub summary: ApplySummary,
    /// True when nothing was added or updated.
    pub no_changes: bool,
    /// `"<path>: <reason>"` for every skipped change.
    pub warnings: Vec<String>,
}

impl ApplyResult {
    pub fn from_changes(changes: Vec<ApplyChange>) -> Self {
        let mut summary = ApplySummary::default();
        let mut warnings = Vec::new();

        for change in &changes {
            summary.record(change.status);
            if let (ChangeStatus::Skipped, Some(reason)) = (change.status, &change.reason) {
                warnings.push(format!("{}: {}", change.path, reason));
            }
        }

        Self {
            no_changes: summary.added + summary.updated == 0,
            changes,
            summary,
            warnings,
        }
    }

    /// Paths that were (or in dry-run would be) written, sorted.
    pub fn changed_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self
            .changes
            .iter()
            .filter(|change| change.status.is_write())
            .map(|change| change.path.as_str())
            .collect();
        paths.sort_unstable();
        paths
    }

    pub fn has_skips(&self) -> bool {
        self.summary.skipped > 0
    }
}
