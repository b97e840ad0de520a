//! Layered run configuration.
//!
//! A run is configured from three layers, later layers replacing earlier
//! values per key:
//!
//! 1. Built-in defaults ([`default_layer`])
//! 2. The repository config file (`.github/agentops-pack.yml` by default)
//! 3. Command-line inputs
//!
//! Keys are matched loosely (`pack_version`, `pack-version` and
//! `packVersion` are the same field). Unknown keys are reported, not
//! rejected, and values of secret-looking keys are redacted before they
//! are shown anywhere.

mod layers;
mod schema;
mod standard;

pub use layers::{
    ConfigLayer, LoadedConfigFile, MergedConfig, RedactedInputs, load_config_file, merge_config,
};
pub use schema::{
    ConfigValidation, ErrorCode, NormalizedLayer, PackConfig, PermissionsMode, ValidationError,
    ValidationWarning, WarningCode, normalize_layer, redact_layer, validate_config,
};
pub use standard::{DEFAULT_CONFIG_PATH, default_layer, standard_manifest};
