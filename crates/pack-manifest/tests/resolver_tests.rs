//! Integration tests for component resolution.

use pack_fs::NormalizedPath;
use pack_manifest::{
    EMPTY_SELECTION_WARNING, PackComponent, PackManifest, SelectionResult, resolve_components,
};
use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use std::fs;
use tempfile::TempDir;

#[fixture]
fn manifest() -> PackManifest {
    PackManifest::new(vec![
        PackComponent::new("instructions"),
        PackComponent::requiring("prompts", ["instructions"]),
        PackComponent::requiring("skills", ["prompts"]),
    ])
}

#[rstest]
fn test_empty_selection_is_graceful(manifest: PackManifest) {
    let result = resolve_components::<&str>(&manifest, &[]);

    assert_eq!(
        result,
        SelectionResult {
            resolved: Some(Vec::new()),
            errors: Vec::new(),
            warnings: vec![EMPTY_SELECTION_WARNING.to_string()],
            empty_selection: true,
        }
    );
}

#[rstest]
fn test_resolves_transitive_dependencies(manifest: PackManifest) {
    let result = resolve_components(&manifest, &["skills"]);

    assert!(result.errors.is_empty());
    assert!(!result.empty_selection);
    assert_eq!(
        result.resolved,
        Some(vec![
            "instructions".to_string(),
            "prompts".to_string(),
            "skills".to_string()
        ])
    );
}

#[rstest]
#[case(&["prompts"], &["instructions", "prompts"])]
#[case(&["instructions"], &["instructions"])]
#[case(&["skills", "instructions", "skills"], &["instructions", "prompts", "skills"])]
fn test_resolved_set_is_closed_and_sorted(
    manifest: PackManifest,
    #[case] selected: &[&str],
    #[case] expected: &[&str],
) {
    let result = resolve_components(&manifest, selected);
    assert_eq!(result.resolved.unwrap(), expected);
}

#[rstest]
fn test_flags_unknown_components(manifest: PackManifest) {
    let result = resolve_components(&manifest, &["missing"]);

    assert_eq!(result.errors, vec!["Unknown component: missing"]);
    assert_eq!(result.resolved, None);
}

#[rstest]
fn test_errors_accumulate_across_requested_names(manifest: PackManifest) {
    let result = resolve_components(&manifest, &["missing", "skills", "other"]);

    assert_eq!(
        result.errors,
        vec!["Unknown component: missing", "Unknown component: other"]
    );
    assert_eq!(result.resolved, None);
}

#[test]
fn test_unknown_requirement_is_reported() {
    let manifest = PackManifest::new(vec![PackComponent::requiring("agents", ["ghost"])]);

    let result = resolve_components(&manifest, &["agents"]);

    assert_eq!(result.errors, vec!["Unknown component: ghost"]);
}

#[test]
fn test_detects_cycles() {
    let manifest = PackManifest::new(vec![
        PackComponent::requiring("a", ["b"]),
        PackComponent::requiring("b", ["a"]),
    ]);

    let result = resolve_components(&manifest, &["a"]);

    assert!(result.errors.iter().any(|e| e.contains("Circular")));
    assert_eq!(result.resolved, None);
}

#[test]
fn test_detects_self_requirement() {
    let manifest = PackManifest::new(vec![PackComponent::requiring("loop", ["loop"])]);

    let result = resolve_components(&manifest, &["loop"]);

    assert_eq!(result.errors, vec!["Circular dependency detected at loop"]);
}

#[test]
fn test_long_chain_does_not_overflow() {
    let mut components = vec![PackComponent::new("c0")];
    for i in 1..500 {
        components.push(PackComponent::requiring(format!("c{i}"), [format!("c{}", i - 1)]));
    }
    let manifest = PackManifest::new(components);

    let result = resolve_components(&manifest, &["c499"]);

    assert!(result.errors.is_empty());
    assert_eq!(result.resolved.unwrap().len(), 500);
}

#[test]
fn test_duplicate_declarations_warn() {
    let manifest = PackManifest::new(vec![
        PackComponent::new("a"),
        PackComponent::requiring("a", ["b"]),
    ]);

    let result = resolve_components(&manifest, &["a"]);

    assert!(result.errors.is_empty());
    assert_eq!(result.warnings, vec!["Duplicate component declaration: a"]);
    assert_eq!(result.resolved.unwrap(), vec!["a"]);
}

#[rstest]
fn test_resolution_is_deterministic(manifest: PackManifest) {
    let first = resolve_components(&manifest, &["skills", "prompts"]);
    let second = resolve_components(&manifest, &["prompts", "skills"]);
    assert_eq!(first, second);
}

#[rstest]
fn test_manifest_is_not_mutated(manifest: PackManifest) {
    let before = manifest.clone();
    let _ = resolve_components(&manifest, &["skills", "missing"]);
    assert_eq!(manifest, before);
}

#[test]
fn test_load_manifest_from_yaml_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("pack.yml");
    fs::write(
        &path,
        "name: Demo\nversion: 2.0.0\ncomponents:\n  - name: base\n  - name: extra\n    requires: [base]\n",
    )
    .unwrap();

    let manifest = PackManifest::load(&NormalizedPath::new(&path)).unwrap();

    assert_eq!(manifest.version.as_deref(), Some("2.0.0"));
    let result = resolve_components(&manifest, &["extra"]);
    assert_eq!(result.resolved.unwrap(), vec!["base", "extra"]);
}
