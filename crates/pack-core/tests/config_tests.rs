//! Tests for configuration layering, validation and redaction

use pack_core::config::{
    ConfigLayer, DEFAULT_CONFIG_PATH, ErrorCode, WarningCode, default_layer, load_config_file,
    merge_config, standard_manifest,
};
use pack_core::{ApplyStrategy, PermissionsMode};
use pack_fs::LineEnding;
use pack_test_utils::repo::TestRepo;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

fn layer(value: Value) -> ConfigLayer {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

#[test]
fn test_precedence_defaults_file_inputs() {
    let defaults = layer(json!({"repo": "foo/bar", "apply": false}));
    let file = layer(json!({"apply": true, "packVersion": "v1"}));
    let inputs = layer(json!({"apply": false, "packVersion": "v2", "components": ["a"]}));

    let merged = merge_config(&defaults, Some(&file), Some(&inputs));

    assert!(merged.errors.is_empty());
    let config = merged.config.unwrap();
    assert!(!config.apply);
    assert_eq!(config.pack_version.as_deref(), Some("v2"));
    assert_eq!(config.components, vec!["a"]);
}

#[test]
fn test_file_overrides_defaults() {
    let defaults = default_layer(&standard_manifest());
    let file = layer(json!({"repo": "o/r", "strategy": "safe", "line_ending": "crlf"}));

    let config = merge_config(&defaults, Some(&file), None).config.unwrap();

    assert_eq!(config.strategy, ApplyStrategy::Safe);
    assert_eq!(config.line_ending, Some(LineEnding::Crlf));
    assert_eq!(config.components.len(), 10);
    assert_eq!(config.permissions_mode, PermissionsMode::Default);
}

#[test]
fn test_key_spellings_normalize() {
    let inputs = layer(json!({
        "repo": "o/r",
        "pack_version": "1.2.3",
        "Permissions-Mode": "cross-repo",
        "override token": "secret-value"
    }));

    let merged = merge_config(&ConfigLayer::new(), None, Some(&inputs));
    let config = merged.config.unwrap();

    assert_eq!(config.pack_version.as_deref(), Some("1.2.3"));
    assert_eq!(config.permissions_mode, PermissionsMode::CrossRepo);
    assert_eq!(config.override_token.as_deref(), Some("secret-value"));
    assert!(merged.unknown_fields.is_empty());
}

#[test]
fn test_unknown_fields_are_warnings() {
    let file = layer(json!({"repo": "o/r", "colour": "blue"}));

    let merged = merge_config(&ConfigLayer::new(), Some(&file), None);

    assert!(merged.config.is_some());
    assert_eq!(merged.unknown_fields, vec!["colour"]);
    assert_eq!(merged.warnings.len(), 1);
    assert_eq!(merged.warnings[0].code, WarningCode::UnknownField);
    assert_eq!(merged.warnings[0].field, "colour");
}

#[test]
fn test_missing_repo_is_an_error() {
    let merged = merge_config(&ConfigLayer::new(), None, None);

    assert!(merged.config.is_none());
    assert_eq!(merged.errors.len(), 1);
    assert_eq!(merged.errors[0].code, ErrorCode::MissingField);
    assert_eq!(merged.errors[0].field, "repo");
}

#[rstest]
#[case::apply(json!({"apply": "yes"}), "apply")]
#[case::strict(json!({"strict": 1}), "strict")]
#[case::components(json!({"components": "a,b"}), "components")]
#[case::component_items(json!({"components": ["a", 2]}), "components")]
#[case::permissions(json!({"permissionsMode": "admin"}), "permissionsMode")]
#[case::strategy(json!({"strategy": "merge"}), "strategy")]
#[case::line_ending(json!({"lineEnding": "cr"}), "lineEnding")]
fn test_type_mismatches(#[case] inputs: Value, #[case] field: &str) {
    let defaults = layer(json!({"repo": "o/r"}));

    let merged = merge_config(&defaults, None, Some(&layer(inputs)));

    assert!(merged.config.is_none());
    assert_eq!(merged.errors.len(), 1);
    assert_eq!(merged.errors[0].code, ErrorCode::TypeMismatch);
    assert_eq!(merged.errors[0].field, field);
}

#[test]
fn test_all_errors_are_reported_together() {
    let inputs = layer(json!({"apply": "x", "strict": "y"}));

    let merged = merge_config(&ConfigLayer::new(), None, Some(&inputs));

    let fields: Vec<&str> = merged.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["repo", "apply", "strict"]);
}

#[test]
fn test_redacted_inputs_hide_secrets() {
    let file = layer(json!({"repo": "o/r", "apiToken": "t0k3n"}));
    let inputs = layer(json!({"overrideToken": "s3cr3t", "strict": true}));

    let merged = merge_config(&ConfigLayer::new(), Some(&file), Some(&inputs));
    let redacted = &merged.redacted_inputs;

    assert_eq!(redacted.file["apiToken"], "***");
    assert_eq!(redacted.file["repo"], "o/r");
    assert_eq!(redacted.inputs["overrideToken"], "***");
    assert_eq!(redacted.inputs["strict"], true);
    let rendered = serde_json::to_string(redacted).unwrap();
    assert!(!rendered.contains("s3cr3t"));
    assert!(!rendered.contains("t0k3n"));
}

#[test]
fn test_load_missing_config_file_is_empty() {
    let repo = TestRepo::new();

    let loaded = load_config_file(&repo.path().join(DEFAULT_CONFIG_PATH));

    assert!(loaded.values.is_empty());
    assert!(loaded.warnings.is_empty());
}

#[test]
fn test_load_yaml_config_file() {
    let repo = TestRepo::new();
    repo.write_file(
        DEFAULT_CONFIG_PATH,
        "repo: owner/name\npack-version: v3\ncomponents:\n  - instructions\n  - skills\n",
    );

    let loaded = load_config_file(&repo.path().join(DEFAULT_CONFIG_PATH));
    let config = merge_config(&ConfigLayer::new(), Some(&loaded.values), None)
        .config
        .unwrap();

    assert_eq!(config.repo, "owner/name");
    assert_eq!(config.pack_version.as_deref(), Some("v3"));
    assert_eq!(config.components, vec!["instructions", "skills"]);
}

#[test]
fn test_load_toml_config_file() {
    let repo = TestRepo::new();
    repo.write_file("pack.toml", "repo = \"owner/name\"\nstrict = true\n");

    let loaded = load_config_file(&repo.path().join("pack.toml"));

    assert_eq!(loaded.values["strict"], true);
}

#[rstest]
#[case::unparsable("repo: [unclosed\n", "Failed to parse")]
#[case::not_a_mapping("- just\n- a list\n", "not a mapping")]
fn test_bad_config_file_is_ignored_with_warning(#[case] content: &str, #[case] expected: &str) {
    let repo = TestRepo::new();
    repo.write_file(DEFAULT_CONFIG_PATH, content);

    let loaded = load_config_file(&repo.path().join(DEFAULT_CONFIG_PATH));

    assert!(loaded.values.is_empty());
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains(expected), "{}", loaded.warnings[0]);
}
