//! Field schema, key normalization, validation and redaction.

use std::fmt;
use std::sync::LazyLock;

use pack_fs::LineEnding;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::apply::ApplyStrategy;
use crate::config::layers::ConfigLayer;

/// Canonical field names, in the order they are documented.
const KNOWN_KEYS: &[&str] = &[
    "repo",
    "packVersion",
    "components",
    "configPath",
    "apply",
    "overrideToken",
    "permissionsMode",
    "strict",
    "strategy",
    "lineEnding",
];

static SECRET_KEY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)token|secret|key").expect("Invalid secret key regex"));

const REDACTED: &str = "***";

/// How the pack is allowed to reach the target repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionsMode {
    #[default]
    Default,
    CrossRepo,
}

impl PermissionsMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CrossRepo => "cross-repo",
        }
    }
}

impl fmt::Display for PermissionsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully validated run configuration.
///
/// Not serializable: `override_token` must never reach output. Report the
/// raw layers through [`redact_layer`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackConfig {
    /// Target repository, `owner/name`.
    pub repo: String,
    pub pack_version: Option<String>,
    pub components: Vec<String>,
    pub apply: bool,
    pub override_token: Option<String>,
    pub permissions_mode: PermissionsMode,
    pub strict: bool,
    pub strategy: ApplyStrategy,
    pub line_ending: Option<LineEnding>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingField,
    TypeMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningCode {
    UnknownField,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn type_mismatch(field: &str, message: &str) -> Self {
        Self {
            code: ErrorCode::TypeMismatch,
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub code: WarningCode,
    pub field: String,
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown config field '{}'", self.field)
    }
}

/// Outcome of [`validate_config`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigValidation {
    /// Present only when `errors` is empty.
    pub config: Option<PackConfig>,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub unknown_fields: Vec<String>,
}

/// One raw layer with its keys mapped to canonical names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedLayer {
    pub values: ConfigLayer,
    pub warnings: Vec<ValidationWarning>,
    pub unknown_fields: Vec<String>,
    /// Every key of the raw layer, secrets masked.
    pub redacted: ConfigLayer,
}

fn squash(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_') && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Canonical name for a raw key, if it names a known field.
fn canonical_key(key: &str) -> Option<&'static str> {
    let squashed = squash(key);
    KNOWN_KEYS
        .iter()
        .copied()
        .find(|known| squash(known) == squashed)
}

fn redact_value(key: &str, value: &Value) -> Value {
    if value.is_string() && SECRET_KEY_REGEX.is_match(key) {
        Value::String(REDACTED.to_string())
    } else {
        value.clone()
    }
}

/// Mask string values of keys that look like secrets.
pub fn redact_layer(layer: &ConfigLayer) -> ConfigLayer {
    layer
        .iter()
        .map(|(key, value)| (key.clone(), redact_value(key, value)))
        .collect()
}

/// Map the keys of a raw layer to canonical field names.
pub fn normalize_layer(raw: &ConfigLayer) -> NormalizedLayer {
    let mut layer = NormalizedLayer::default();

    for (key, value) in raw {
        match canonical_key(key) {
            Some(canonical) => {
                layer.values.insert(canonical.to_string(), value.clone());
                layer
                    .redacted
                    .insert(canonical.to_string(), redact_value(canonical, value));
            }
            None => {
                tracing::debug!(field = %key, "unknown config field");
                layer.warnings.push(ValidationWarning {
                    code: WarningCode::UnknownField,
                    field: key.clone(),
                });
                layer.unknown_fields.push(key.clone());
                layer.redacted.insert(key.clone(), redact_value(key, value));
            }
        }
    }

    layer
}

/// Non-empty string value, `None` for absent or blank strings.
fn optional_string(
    values: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<String> {
    match values.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.is_empty() => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(ValidationError::type_mismatch(
                field,
                &format!("{field} must be a string"),
            ));
            None
        }
    }
}

fn optional_bool(
    values: &Map<String, Value>,
    field: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<bool> {
    match values.get(field) {
        None => None,
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(ValidationError::type_mismatch(
                field,
                &format!("{field} must be boolean"),
            ));
            None
        }
    }
}

fn optional_parsed<T: std::str::FromStr>(
    values: &Map<String, Value>,
    field: &str,
    message: &str,
    errors: &mut Vec<ValidationError>,
) -> Option<T> {
    let value = values.get(field)?;
    match value.as_str().map(str::parse::<T>) {
        Some(Ok(parsed)) => Some(parsed),
        _ => {
            errors.push(ValidationError::type_mismatch(field, message));
            None
        }
    }
}

impl std::str::FromStr for PermissionsMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(Self::Default),
            "cross-repo" => Ok(Self::CrossRepo),
            _ => Err(()),
        }
    }
}

/// Validate a merged layer into a [`PackConfig`].
///
/// Every field is checked so all problems are reported together. Keys that
/// are not canonical field names are reported as unknown.
pub fn validate_config(values: &ConfigLayer) -> ConfigValidation {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut unknown_fields = Vec::new();

    for key in values.keys() {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            warnings.push(ValidationWarning {
                code: WarningCode::UnknownField,
                field: key.clone(),
            });
            unknown_fields.push(key.clone());
        }
    }

    let repo = match values.get("repo") {
        Some(Value::String(repo)) if !repo.trim().is_empty() => Some(repo.clone()),
        _ => {
            errors.push(ValidationError {
                code: ErrorCode::MissingField,
                field: "repo".to_string(),
                message: "repo is required".to_string(),
            });
            None
        }
    };

    let pack_version = optional_string(values, "packVersion", &mut errors);

    let components = match values.get("components") {
        None => Some(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>(),
        Some(_) => None,
    };
    if components.is_none() {
        errors.push(ValidationError::type_mismatch(
            "components",
            "components must be an array of strings when provided",
        ));
    }

    // configPath only locates the file and is consumed before loading.
    optional_string(values, "configPath", &mut errors);
    let apply = optional_bool(values, "apply", &mut errors);
    let override_token = optional_string(values, "overrideToken", &mut errors);
    let permissions_mode = optional_parsed::<PermissionsMode>(
        values,
        "permissionsMode",
        "permissionsMode must be 'default' or 'cross-repo'",
        &mut errors,
    );
    let strict = optional_bool(values, "strict", &mut errors);
    let strategy = optional_parsed::<ApplyStrategy>(
        values,
        "strategy",
        "strategy must be 'safe', 'refresh' or 'overwrite'",
        &mut errors,
    );
    let line_ending = optional_parsed::<LineEnding>(
        values,
        "lineEnding",
        "lineEnding must be 'lf' or 'crlf'",
        &mut errors,
    );

    let config = match (repo, components) {
        (Some(repo), Some(components)) if errors.is_empty() => Some(PackConfig {
            repo,
            pack_version,
            components,
            apply: apply.unwrap_or(false),
            override_token,
            permissions_mode: permissions_mode.unwrap_or_default(),
            strict: strict.unwrap_or(false),
            strategy: strategy.unwrap_or_default(),
            line_ending,
        }),
        _ => None,
    };

    ConfigValidation {
        config,
        errors,
        warnings,
        unknown_fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layer(value: Value) -> ConfigLayer {
        match value {
            Value::Object(map) => map,
            _ => panic!("test layer must be an object"),
        }
    }

    #[test]
    fn test_canonical_key_variants() {
        assert_eq!(canonical_key("pack_version"), Some("packVersion"));
        assert_eq!(canonical_key("pack-version"), Some("packVersion"));
        assert_eq!(canonical_key("PACKVERSION"), Some("packVersion"));
        assert_eq!(canonical_key("line ending"), Some("lineEnding"));
        assert_eq!(canonical_key("bogus"), None);
    }

    #[test]
    fn test_redacts_secret_strings_only() {
        let redacted = redact_layer(&layer(json!({
            "overrideToken": "abc",
            "apiKey": "k",
            "keyCount": 3,
            "repo": "o/r"
        })));
        assert_eq!(redacted["overrideToken"], "***");
        assert_eq!(redacted["apiKey"], "***");
        assert_eq!(redacted["keyCount"], 3);
        assert_eq!(redacted["repo"], "o/r");
    }

    #[test]
    fn test_blank_optional_strings_become_none() {
        let validation = validate_config(&layer(json!({"repo": "o/r", "packVersion": ""})));
        assert_eq!(validation.config.unwrap().pack_version, None);
    }

    #[test]
    fn test_permissions_mode_parse() {
        assert_eq!("cross-repo".parse::<PermissionsMode>(), Ok(PermissionsMode::CrossRepo));
        assert!("admin".parse::<PermissionsMode>().is_err());
    }
}
