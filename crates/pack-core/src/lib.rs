//! Apply pipeline, configuration and reporting for the AgentOps pack applier
//!
//! This crate wires the merge engine and the component resolver into the
//! operations a caller runs against a target repository:
//!
//! - **Apply**: write-policy aware application of pack files ([`apply_files`])
//! - **Report**: deterministic change sets and summary counts ([`ApplyResult`])
//! - **Configuration**: layered defaults / file / input config ([`config`])
//! - **Sources**: mapping component names to pack files ([`source`])
//! - **Summary**: pull-request body rendering ([`summary`])
//!
//! # Architecture
//!
//! ```text
//!                     pack-cli
//!                        |
//!                    pack-core
//!                        |
//!        +---------------+---------------+
//!        |               |               |
//!   pack-blocks    pack-manifest      pack-fs
//! ```

pub mod apply;
pub mod config;
pub mod error;
pub mod report;
pub mod source;
pub mod summary;

pub use apply::{ApplyMode, ApplyOptions, ApplyStrategy, PackFile, apply_files};
pub use config::{PackConfig, PermissionsMode, merge_config, standard_manifest};
pub use error::{Error, Result};
pub use pack_blocks::ChangeStatus;
pub use pack_manifest::{PackManifest, SelectionResult, resolve_components};
pub use report::{ApplyChange, ApplyResult, ApplySummary};
pub use source::{PackSourceResult, SourceMapping, load_pack_source};
pub use summary::{PrContext, build_pr_body};
