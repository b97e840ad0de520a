//! Filesystem primitives for the AgentOps pack applier
//!
//! Provides forward-slash normalized paths, read-if-exists and
//! parent-creating atomic writes, line-ending handling and
//! format-agnostic config file loading.

pub mod config;
pub mod error;
pub mod io;
pub mod line_ending;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use line_ending::{LineEnding, normalize_line_endings};
pub use path::NormalizedPath;
