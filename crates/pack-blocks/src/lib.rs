//! Managed-section markers and merge engine for the AgentOps pack applier.
//!
//! The [`marker`] module defines how a managed section is framed inside
//! arbitrary text and how a single section's block is located and
//! replaced. The [`merge`] module decides, for one file, whether the
//! desired sections produce an added, updated, unchanged or skipped file.
//!
//! Both modules are pure: no I/O, and the output never depends on input
//! ordering beyond what is sorted explicitly.

pub mod error;
pub mod marker;
pub mod merge;

pub use error::{Error, Result};
pub use marker::{
    Block, BlockLocation, MARKER_PREFIX, format_block, has_markers, locate_block, parse_blocks,
    render_managed_file, replace_block,
};
pub use merge::{ChangeStatus, ManagedSection, MergeOutcome, merge_sections};
