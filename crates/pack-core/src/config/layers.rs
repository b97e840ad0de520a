//! Loading and merging of configuration layers.

use pack_fs::{ConfigStore, NormalizedPath};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::schema::{
    PackConfig, ValidationError, ValidationWarning, normalize_layer, redact_layer,
    validate_config,
};

/// One raw configuration layer: a flat key/value mapping.
pub type ConfigLayer = Map<String, Value>;

/// Redacted view of every layer that went into a merge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RedactedInputs {
    pub defaults: ConfigLayer,
    pub file: ConfigLayer,
    pub inputs: ConfigLayer,
}

/// Result of [`merge_config`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedConfig {
    /// Present only when `errors` is empty.
    pub config: Option<PackConfig>,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    /// Unknown keys from the file and input layers, as written.
    pub unknown_fields: Vec<String>,
    pub redacted_inputs: RedactedInputs,
}

/// Merge `defaults <- file <- inputs` and validate the result.
///
/// Keys of the file and input layers are normalized first. Later layers
/// replace earlier values per key.
pub fn merge_config(
    defaults: &ConfigLayer,
    file: Option<&ConfigLayer>,
    inputs: Option<&ConfigLayer>,
) -> MergedConfig {
    let empty = ConfigLayer::new();
    let file = normalize_layer(file.unwrap_or(&empty));
    let inputs = normalize_layer(inputs.unwrap_or(&empty));

    let mut merged = defaults.clone();
    for (layer, values) in [("file", &file.values), ("inputs", &inputs.values)] {
        for (key, value) in values {
            tracing::trace!(layer, field = %key, "config value");
            merged.insert(key.clone(), value.clone());
        }
    }

    let validation = validate_config(&merged);

    let mut warnings = file.warnings;
    warnings.extend(inputs.warnings);
    warnings.extend(validation.warnings);

    let mut unknown_fields = file.unknown_fields;
    unknown_fields.extend(inputs.unknown_fields);

    tracing::debug!(
        errors = validation.errors.len(),
        warnings = warnings.len(),
        "merged configuration layers"
    );

    MergedConfig {
        config: validation.config,
        errors: validation.errors,
        warnings,
        unknown_fields,
        redacted_inputs: RedactedInputs {
            defaults: redact_layer(defaults),
            file: file.redacted,
            inputs: inputs.redacted,
        },
    }
}

/// A config file layer and the problems found while loading it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedConfigFile {
    pub values: ConfigLayer,
    pub warnings: Vec<String>,
}

/// Load a config file as a raw layer.
///
/// A missing file yields an empty layer. A file that cannot be parsed, or
/// whose top level is not a mapping, yields an empty layer and a warning.
pub fn load_config_file(path: &NormalizedPath) -> LoadedConfigFile {
    if !path.is_file() {
        tracing::info!(%path, "no config file found, using defaults");
        return LoadedConfigFile::default();
    }

    match ConfigStore::new().load::<Value>(path) {
        Ok(Value::Object(values)) => {
            tracing::debug!(%path, keys = values.len(), "loaded config file");
            LoadedConfigFile {
                values,
                warnings: Vec::new(),
            }
        }
        Ok(Value::Null) => {
            tracing::debug!(%path, "config file is empty");
            LoadedConfigFile::default()
        }
        Ok(_) => {
            let warning = format!("Config file {path} is not a mapping; ignoring it.");
            tracing::warn!("{warning}");
            LoadedConfigFile {
                values: ConfigLayer::new(),
                warnings: vec![warning],
            }
        }
        Err(e) => {
            let warning = format!("Failed to parse config file {path}: {e}");
            tracing::warn!("{warning}");
            LoadedConfigFile {
                values: ConfigLayer::new(),
                warnings: vec![warning],
            }
        }
    }
}
