//! Command implementations for pack-cli

pub mod resolve;
pub mod run;
pub mod sections;

pub use resolve::run_resolve;
pub use run::{PrBodyOptions, run_apply, run_pr_body};
pub use sections::run_sections;

use std::path::Path;

use pack_core::PackManifest;
use pack_core::config::standard_manifest;
use pack_fs::NormalizedPath;

use crate::error::Result;

/// Load the manifest at `path`, or the standard manifest.
pub fn load_manifest(path: Option<&Path>) -> Result<PackManifest> {
    match path {
        Some(path) => Ok(PackManifest::load(&NormalizedPath::new(path))?),
        None => Ok(standard_manifest()),
    }
}
