//! Component manifest parsing.
//!
//! # Example TOML
//!
//! ```toml
//! name = "AgentOps Pack (Standard)"
//! version = "0.1.0"
//!
//! [[components]]
//! name = "instructions"
//!
//! [[components]]
//! name = "prompts"
//! requires = ["instructions"]
//! ```

use pack_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A named, independently selectable bundle of pack files.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackComponent {
    pub name: String,
    /// Names of components that must be installed alongside this one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,
}

impl PackComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            requires: Vec::new(),
        }
    }

    pub fn requiring<I, S>(name: impl Into<String>, requires: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            requires: requires.into_iter().map(Into::into).collect(),
        }
    }
}

/// Declared dependency graph over named components.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackManifest {
    /// Display name of the pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Pack version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub components: Vec<PackComponent>,
}

impl PackManifest {
    pub fn new(components: Vec<PackComponent>) -> Self {
        Self {
            name: None,
            version: None,
            components,
        }
    }

    /// Parse a manifest from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Parse a manifest from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let manifest: Self = serde_yaml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Load a manifest file, choosing the format from its extension.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let manifest: Self = ConfigStore::new().load(path)?;
        manifest.validate()?;
        tracing::debug!(
            %path,
            components = manifest.components.len(),
            "loaded component manifest"
        );
        Ok(manifest)
    }

    /// Names of all declared components, in declaration order.
    pub fn component_names(&self) -> Vec<String> {
        self.components.iter().map(|c| c.name.clone()).collect()
    }

    /// Reject component names that are empty or contain whitespace.
    fn validate(&self) -> Result<()> {
        for component in &self.components {
            let name = &component.name;
            if name.trim().is_empty() {
                return Err(Error::InvalidName {
                    name: name.clone(),
                    reason: "component name must not be empty".to_string(),
                });
            }
            if name.chars().any(char::is_whitespace) {
                return Err(Error::InvalidName {
                    name: name.clone(),
                    reason: "component name must not contain whitespace".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let manifest = PackManifest::from_toml(
            r#"
name = "test-pack"
version = "1.0.0"

[[components]]
name = "instructions"

[[components]]
name = "prompts"
requires = ["instructions"]
"#,
        )
        .unwrap();

        assert_eq!(manifest.name.as_deref(), Some("test-pack"));
        assert_eq!(manifest.components.len(), 2);
        assert_eq!(manifest.components[1].requires, vec!["instructions"]);
    }

    #[test]
    fn test_from_yaml_without_metadata() {
        let manifest = PackManifest::from_yaml(
            "components:\n  - name: a\n  - name: b\n    requires: [a]\n",
        )
        .unwrap();

        assert_eq!(manifest.name, None);
        assert_eq!(manifest.component_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_rejects_blank_name() {
        let err = PackManifest::from_yaml("components:\n  - name: \"  \"\n").unwrap_err();
        assert!(matches!(err, Error::InvalidName { .. }));
    }

    #[test]
    fn test_rejects_name_with_space() {
        let err = PackManifest::from_toml("[[components]]\nname = \"two words\"\n").unwrap_err();
        assert!(err.to_string().contains("whitespace"));
    }
}
