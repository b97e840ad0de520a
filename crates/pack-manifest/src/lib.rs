//! Component manifests and dependency resolution.
//!
//! A [`PackManifest`] declares named components and the components each
//! one requires. [`resolve_components`] expands a user selection into the
//! dependency-closed install set, reporting unknown names and cycles as
//! data rather than failing.
//!
//! There is no built-in manifest here; callers pass one explicitly.

pub mod error;
pub mod graph;
pub mod manifest;
pub mod resolver;

pub use error::{Error, Result};
pub use graph::ComponentGraph;
pub use manifest::{PackComponent, PackManifest};
pub use resolver::{EMPTY_SELECTION_WARNING, SelectionResult, resolve_components};
