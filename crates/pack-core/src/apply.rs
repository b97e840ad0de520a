//! Write-policy aware application of pack files to a target tree.

use std::fmt;
use std::str::FromStr;

use pack_blocks::{ChangeStatus, ManagedSection, merge_sections};
use pack_fs::{LineEnding, NormalizedPath, io};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::{ApplyChange, ApplyResult};

/// Reason reported by the `safe` strategy for a file that already exists.
pub const REASON_FILE_EXISTS: &str = "file exists";

/// Reason reported for a path that would land outside the target tree.
pub const REASON_UNSAFE_PATH: &str = "path escapes target directory";

/// One candidate file from the pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackFile {
    /// Repo-relative, forward-slash path.
    pub path: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub managed_id: Option<String>,
}

impl PackFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            managed_id: None,
        }
    }

    pub fn with_managed_id(mut self, id: impl Into<String>) -> Self {
        self.managed_id = Some(id.into());
        self
    }

    /// The managed section id, falling back to the path.
    pub fn section_id(&self) -> &str {
        self.managed_id.as_deref().unwrap_or(&self.path)
    }
}

/// Per-run policy for files that already exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStrategy {
    /// Never modify an existing file.
    Safe,
    /// Only touch content inside managed blocks.
    #[default]
    Refresh,
    /// Replace the whole file.
    Overwrite,
}

impl ApplyStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Refresh => "refresh",
            Self::Overwrite => "overwrite",
        }
    }
}

impl fmt::Display for ApplyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplyStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "refresh" => Ok(Self::Refresh),
            "overwrite" => Ok(Self::Overwrite),
            other => Err(format!(
                "unknown strategy '{other}' (expected safe, refresh or overwrite)"
            )),
        }
    }
}

/// Whether decisions are written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplyMode {
    #[default]
    DryRun,
    Apply,
}

impl ApplyMode {
    pub fn from_apply_flag(apply: bool) -> Self {
        if apply { Self::Apply } else { Self::DryRun }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DryRun => "dry-run",
            Self::Apply => "apply",
        }
    }
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`apply_files`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyOptions {
    pub mode: ApplyMode,
    pub strategy: ApplyStrategy,
    /// Forced line ending; detected per file when `None`.
    pub line_ending: Option<LineEnding>,
}

impl ApplyOptions {
    pub fn dry_run(strategy: ApplyStrategy) -> Self {
        Self {
            mode: ApplyMode::DryRun,
            strategy,
            line_ending: None,
        }
    }

    pub fn apply(strategy: ApplyStrategy) -> Self {
        Self {
            mode: ApplyMode::Apply,
            strategy,
            line_ending: None,
        }
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = Some(line_ending);
        self
    }
}

/// Decision for one file before any write happens.
struct Plan {
    status: ChangeStatus,
    reason: Option<String>,
    /// LF-normalized content to write when `status` is a write.
    content: String,
}

impl Plan {
    fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: ChangeStatus::Skipped,
            reason: Some(reason.into()),
            content: String::new(),
        }
    }
}

fn plan(file: &PackFile, existing: Option<&str>, strategy: ApplyStrategy) -> Plan {
    match (strategy, existing) {
        (ApplyStrategy::Safe, Some(_)) => Plan::skipped(REASON_FILE_EXISTS),
        (ApplyStrategy::Overwrite, existing) => Plan {
            status: if existing.is_some() {
                ChangeStatus::Updated
            } else {
                ChangeStatus::Added
            },
            reason: None,
            content: file.content.clone(),
        },
        (ApplyStrategy::Safe | ApplyStrategy::Refresh, existing) => {
            let section = ManagedSection::new(file.section_id(), file.content.as_str());
            let outcome = merge_sections(existing, std::slice::from_ref(&section));
            Plan {
                status: outcome.status,
                reason: outcome.reason,
                content: outcome.content,
            }
        }
    }
}

/// Apply `files` to the tree rooted at `base_path`.
///
/// Files are processed in path order and each yields exactly one
/// [`ApplyChange`]. Only added and updated files are written, and only in
/// [`ApplyMode::Apply`]. Conflicts never fail the run; they are reported
/// as skipped changes with a reason.
///
/// # Errors
///
/// Returns an error when reading or writing a target file fails.
pub fn apply_files(
    base_path: &NormalizedPath,
    files: &[PackFile],
    options: &ApplyOptions,
) -> Result<ApplyResult> {
    let mut ordered: Vec<(NormalizedPath, &PackFile)> = files
        .iter()
        .map(|file| (NormalizedPath::new(&file.path), file))
        .collect();
    ordered.sort_by(|(a, _), (b, _)| a.as_str().cmp(b.as_str()));

    let mut changes = Vec::with_capacity(ordered.len());

    for (relative, file) in ordered {
        if !relative.is_safe_relative() {
            tracing::warn!(path = %relative, "refusing to write outside the target directory");
            changes.push(ApplyChange::skipped(relative.as_str(), REASON_UNSAFE_PATH));
            continue;
        }

        let target = base_path.join(relative.as_str());
        let existing = io::read_text_if_exists(&target)?;
        let line_ending = options
            .line_ending
            .unwrap_or_else(|| LineEnding::detect(existing.as_deref()));

        let Plan {
            status,
            reason,
            content,
        } = plan(file, existing.as_deref(), options.strategy);
        tracing::debug!(
            path = %relative,
            %status,
            strategy = %options.strategy,
            reason = reason.as_deref().unwrap_or(""),
            "planned file"
        );

        if status.is_write() && options.mode == ApplyMode::Apply {
            io::write_text(&target, &line_ending.apply(&content))?;
            tracing::info!(path = %relative, %status, %line_ending, "wrote file");
        }

        changes.push(ApplyChange {
            path: relative.as_str().to_string(),
            status,
            reason,
        });
    }

    let result = ApplyResult::from_changes(changes);
    tracing::debug!(mode = %options.mode, summary = %result.summary, "apply finished");
    Ok(result)
}
