//! Built-in defaults for the standard AgentOps pack.

use pack_manifest::{PackComponent, PackManifest};
use serde_json::Value;

use crate::config::layers::ConfigLayer;

/// Config file consulted when no explicit path is given.
pub const DEFAULT_CONFIG_PATH: &str = ".github/agentops-pack.yml";

/// The standard AgentOps pack manifest.
pub fn standard_manifest() -> PackManifest {
    PackManifest {
        name: Some("AgentOps Pack (Standard)".to_string()),
        version: Some("0.1.0".to_string()),
        components: vec![
            PackComponent::new("instructions"),
            PackComponent::requiring("agents", ["instructions"]),
            PackComponent::requiring("prompts", ["instructions"]),
            PackComponent::requiring("skills", ["prompts"]),
            PackComponent::new("repo-profile"),
            PackComponent::new("mcp"),
            PackComponent::new("decision-log"),
            PackComponent::new("specs"),
            PackComponent::new("context"),
            PackComponent::new("memory"),
        ],
    }
}

/// Defaults layer for `manifest`: every component selected, dry-run,
/// default permissions, non-strict.
pub fn default_layer(manifest: &PackManifest) -> ConfigLayer {
    let components = manifest
        .component_names()
        .into_iter()
        .map(Value::String)
        .collect();

    let mut layer = ConfigLayer::new();
    layer.insert("components".to_string(), Value::Array(components));
    layer.insert("apply".to_string(), Value::Bool(false));
    layer.insert(
        "permissionsMode".to_string(),
        Value::String("default".to_string()),
    );
    layer.insert("strict".to_string(), Value::Bool(false));
    layer
}
