//! Managed-section marker protocol.
//!
//! A managed section is framed in arbitrary text as:
//! ```text
//! <!-- agentops:begin ID -->
//! content
//! <!-- agentops:end ID -->
//! ```
//!
//! Every function here operates on LF-normalized text. Block location is
//! an explicit scan rather than a composed pattern so that a begin marker
//! without its end marker is reported instead of swallowing the rest of
//! the file.

use crate::error::{Error, Result};
use crate::merge::ManagedSection;
use regex::Regex;
use std::sync::LazyLock;

/// Literal prefix shared by every marker.
pub const MARKER_PREFIX: &str = "<!-- agentops:";

/// Regex for matching begin markers of any id.
static BEGIN_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!-- agentops:begin (.+?) -->").expect("Invalid begin marker regex")
});

/// A well-formed block found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// The section id carried by both markers.
    pub id: String,
    /// The content between the markers, without the framing newlines.
    pub content: String,
    /// The 1-based line number of the begin marker.
    pub start_line: usize,
    /// The 1-based line number of the end marker.
    pub end_line: usize,
}

/// Result of searching text for the block of one section id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockLocation {
    /// Byte range covering the begin marker through the end marker.
    Found { start: usize, end: usize },
    /// A begin marker on `line` (1-based) has no end marker before the
    /// next begin marker for the same id or the end of the text.
    Unterminated { line: usize },
    /// No begin marker for the id.
    Absent,
}

pub fn begin_marker(id: &str) -> String {
    format!("<!-- agentops:begin {id} -->")
}

pub fn end_marker(id: &str) -> String {
    format!("<!-- agentops:end {id} -->")
}

/// Render one section as a complete block.
///
/// Trailing whitespace of `content` is trimmed so re-rendering the same
/// section is stable.
pub fn format_block(id: &str, content: &str) -> String {
    format!(
        "{}\n{}\n{}",
        begin_marker(id),
        content.trim_end(),
        end_marker(id)
    )
}

/// Whether the text contains any marker at all.
///
/// Text without markers is treated as unmanaged and never rewritten.
pub fn has_markers(text: &str) -> bool {
    text.contains(MARKER_PREFIX)
}

/// Locate the first block for `id`.
///
/// # Example
/// ```
/// use pack_blocks::marker::{BlockLocation, locate_block};
///
/// let text = "<!-- agentops:begin a -->\nbody\n<!-- agentops:end a -->";
/// assert_eq!(locate_block(text, "a"), BlockLocation::Found { start: 0, end: text.len() });
/// assert_eq!(locate_block("<!-- agentops:begin a -->\nbody", "a"), BlockLocation::Unterminated { line: 1 });
/// ```
pub fn locate_block(text: &str, id: &str) -> BlockLocation {
    locate_from(text, id, 0, &begin_marker(id), &end_marker(id))
}

fn locate_from(text: &str, id: &str, from: usize, begin: &str, end: &str) -> BlockLocation {
    let Some(offset) = text[from..].find(begin) else {
        return BlockLocation::Absent;
    };
    let start = from + offset;
    let body_start = start + begin.len();
    let rest = &text[body_start..];

    let next_end = rest.find(end);
    let next_begin = rest.find(begin);
    match (next_end, next_begin) {
        (Some(e), Some(b)) if b < e => BlockLocation::Unterminated {
            line: line_of(text, start),
        },
        (Some(e), _) => BlockLocation::Found {
            start,
            end: body_start + e + end.len(),
        },
        (None, _) => {
            tracing::trace!(id, "begin marker without end marker");
            BlockLocation::Unterminated {
                line: line_of(text, start),
            }
        }
    }
}

/// Replace every block for `id` with a freshly rendered block.
///
/// Returns `Ok(None)` when the text carries no block for `id`, and
/// `Error::UnterminatedBlock` when any begin marker for `id` is not closed.
/// Text outside the replaced blocks is copied unchanged.
pub fn replace_block(text: &str, id: &str, content: &str) -> Result<Option<String>> {
    let begin = begin_marker(id);
    let end = end_marker(id);
    let replacement = format_block(id, content);

    let mut output = String::with_capacity(text.len() + replacement.len());
    let mut cursor = 0;
    let mut replaced = false;

    loop {
        match locate_from(text, id, cursor, &begin, &end) {
            BlockLocation::Found { start, end } => {
                output.push_str(&text[cursor..start]);
                output.push_str(&replacement);
                cursor = end;
                replaced = true;
            }
            BlockLocation::Unterminated { line } => {
                return Err(Error::UnterminatedBlock {
                    id: id.to_string(),
                    line,
                });
            }
            BlockLocation::Absent => break,
        }
    }

    if !replaced {
        return Ok(None);
    }
    output.push_str(&text[cursor..]);
    Ok(Some(output))
}

/// Parse every well-formed block, in order of appearance.
///
/// Unterminated begin markers are skipped.
pub fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();

    for caps in BEGIN_MARKER_REGEX.captures_iter(text) {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let id = id.as_str();
        let BlockLocation::Found { start, end } =
            locate_from(text, id, whole.start(), &begin_marker(id), &end_marker(id))
        else {
            continue;
        };

        let body_start = whole.end();
        let body_end = end - end_marker(id).len();
        let raw = &text[body_start..body_end];
        let raw = raw.strip_prefix('\n').unwrap_or(raw);
        let content = raw.strip_suffix('\n').unwrap_or(raw);

        blocks.push(Block {
            id: id.to_string(),
            content: content.to_string(),
            start_line: line_of(text, start),
            end_line: line_of(text, body_end),
        });
    }

    blocks
}

/// Render sections as the content of a newly created file.
///
/// Sections are sorted by id and separated by a blank line; the result
/// ends with a single newline.
pub fn render_managed_file(sections: &[ManagedSection]) -> String {
    if sections.is_empty() {
        return String::new();
    }
    let mut ordered: Vec<&ManagedSection> = sections.iter().collect();
    ordered.sort_by(|a, b| a.id.cmp(&b.id));

    let mut rendered = ordered
        .iter()
        .map(|section| format_block(&section.id, &section.content))
        .collect::<Vec<_>>()
        .join("\n\n");
    rendered.push('\n');
    rendered
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
