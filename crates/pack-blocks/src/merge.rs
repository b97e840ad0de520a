//! Per-file merge of managed sections into existing content.

use crate::error::Error;
use crate::marker::{begin_marker, end_marker, has_markers, render_managed_file, replace_block};
use pack_fs::normalize_line_endings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reason reported when an existing file carries no marker at all.
pub const REASON_NO_MARKERS: &str = "No managed markers present; skipping file to avoid overwrites.";

/// Reason reported when markers exist but none belong to a requested section.
pub const REASON_NO_MATCHING_SECTIONS: &str =
    "Managed markers found, but no matching section IDs to update.";

/// Reason reported when a section's content carries one of its own markers.
pub const REASON_SELF_MARKER: &str =
    "Section content contains its own managed marker; skipping file.";

/// Outcome classification for one file in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeStatus {
    Added,
    Updated,
    Unchanged,
    Skipped,
}

impl ChangeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Skipped => "skipped",
        }
    }

    /// Whether this status results in a write.
    pub fn is_write(self) -> bool {
        matches!(self, Self::Added | Self::Updated)
    }
}

impl fmt::Display for ChangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named block of generated text owned by the applier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedSection {
    pub id: String,
    pub content: String,
}

impl ManagedSection {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Computed content and classification for one file.
///
/// `content` is LF-normalized. For skipped files it is the existing
/// content unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub content: String,
    pub status: ChangeStatus,
    pub reason: Option<String>,
}

impl MergeOutcome {
    fn skipped(content: String, reason: impl Into<String>) -> Self {
        Self {
            content,
            status: ChangeStatus::Skipped,
            reason: Some(reason.into()),
        }
    }
}

/// Merge `sections` into `existing` file content.
///
/// - no existing file: `Added`, content is the rendered sections
/// - existing file without markers: `Skipped`
/// - a requested section whose begin marker is never closed: `Skipped`
/// - markers present but none for a requested id: `Skipped`
/// - a section whose content contains its own begin or end marker:
///   `Skipped`, whether or not the file exists
/// - at least one block replaced: `Updated`, or `Unchanged` when the
///   result is byte-identical
///
/// Section content is LF-normalized before rendering. Sections with
/// duplicate ids collapse to the last one given.
///
/// # Example
/// ```
/// use pack_blocks::{ChangeStatus, ManagedSection, merge_sections};
///
/// let sections = [ManagedSection::new("a", "hello")];
/// let first = merge_sections(None, &sections);
/// assert_eq!(first.status, ChangeStatus::Added);
///
/// let second = merge_sections(Some(&first.content), &sections);
/// assert_eq!(second.status, ChangeStatus::Unchanged);
/// ```
pub fn merge_sections(existing: Option<&str>, sections: &[ManagedSection]) -> MergeOutcome {
    let mut by_id: BTreeMap<&str, String> = BTreeMap::new();
    for section in sections {
        if by_id
            .insert(section.id.as_str(), normalize_line_endings(&section.content))
            .is_some()
        {
            tracing::debug!(id = %section.id, "duplicate section id, keeping the last one");
        }
    }

    let normalized = existing.map(normalize_line_endings).unwrap_or_default();

    if let Some((id, _)) = by_id.iter().find(|(id, content)| {
        content.contains(&begin_marker(id)) || content.contains(&end_marker(id))
    }) {
        tracing::warn!(id = %id, "section content embeds its own marker");
        return MergeOutcome::skipped(normalized, REASON_SELF_MARKER);
    }

    if existing.is_none() {
        let unique: Vec<ManagedSection> = by_id
            .iter()
            .map(|(id, content)| ManagedSection::new(*id, content.as_str()))
            .collect();
        return MergeOutcome {
            content: render_managed_file(&unique),
            status: ChangeStatus::Added,
            reason: None,
        };
    }

    if !has_markers(&normalized) {
        return MergeOutcome::skipped(normalized, REASON_NO_MARKERS);
    }

    let mut updated = normalized.clone();
    let mut replacements = 0usize;

    for (id, content) in &by_id {
        match replace_block(&updated, id, content) {
            Ok(Some(next)) => {
                updated = next;
                replacements += 1;
            }
            Ok(None) => {
                tracing::trace!(id, "no block for section");
            }
            Err(Error::UnterminatedBlock { id, line }) => {
                let reason = format!(
                    "Managed section '{id}' is malformed: begin marker on line {line} has no matching end marker; skipping file."
                );
                return MergeOutcome::skipped(normalized, reason);
            }
        }
    }

    if replacements == 0 {
        return MergeOutcome::skipped(normalized, REASON_NO_MATCHING_SECTIONS);
    }

    let status = if updated == normalized {
        ChangeStatus::Unchanged
    } else {
        ChangeStatus::Updated
    };
    tracing::debug!(replacements, %status, "merged managed sections");

    MergeOutcome {
        content: updated,
        status,
        reason: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(ChangeStatus::Skipped.to_string(), "skipped");
        assert!(ChangeStatus::Added.is_write());
        assert!(!ChangeStatus::Unchanged.is_write());
    }

    #[test]
    fn test_duplicate_ids_collapse_to_last() {
        let outcome = merge_sections(
            None,
            &[ManagedSection::new("a", "first"), ManagedSection::new("a", "second")],
        );
        assert_eq!(
            outcome.content,
            "<!-- agentops:begin a -->\nsecond\n<!-- agentops:end a -->\n"
        );
    }

    #[test]
    fn test_section_content_is_lf_normalized() {
        let outcome = merge_sections(None, &[ManagedSection::new("a", "one\r\ntwo\r\n")]);
        assert_eq!(
            outcome.content,
            "<!-- agentops:begin a -->\none\ntwo\n<!-- agentops:end a -->\n"
        );
    }

    #[test]
    fn test_skip_returns_normalized_existing() {
        let outcome = merge_sections(Some("plain\r\ntext"), &[ManagedSection::new("a", "x")]);
        assert_eq!(outcome.status, ChangeStatus::Skipped);
        assert_eq!(outcome.content, "plain\ntext");
    }
}
