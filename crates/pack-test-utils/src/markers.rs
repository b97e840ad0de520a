//! Builders for marker text used in fixture files.
//!
//! Kept independent of `pack-blocks` so tests assert against the literal
//! on-disk format rather than the code under test.

/// A complete managed block for `id`.
pub fn block(id: &str, content: &str) -> String {
    format!("<!-- agentops:begin {id} -->\n{content}\n<!-- agentops:end {id} -->")
}

/// A begin marker for `id` with no matching end marker.
pub fn unterminated(id: &str, content: &str) -> String {
    format!("<!-- agentops:begin {id} -->\n{content}")
}

/// The content a fresh file gets for a single section.
pub fn rendered(id: &str, content: &str) -> String {
    format!("{}\n", block(id, content.trim_end()))
}
