//! Mapping of component names to files in a pack source tree.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;

use pack_fs::{NormalizedPath, io};

use crate::apply::PackFile;
use crate::error::{Error, Result};

/// Component name -> source paths, relative to the pack root.
///
/// Each path may name a file or a directory; directories are collected
/// recursively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceMapping {
    paths: BTreeMap<String, Vec<String>>,
}

impl SourceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping for the standard AgentOps pack layout.
    pub fn standard() -> Self {
        Self::new()
            .with(
                "instructions",
                [".github/copilot-instructions.md", ".github/instructions"],
            )
            .with("agents", [".github/agents"])
            .with("prompts", [".github/prompts"])
            .with("skills", [".copilot/skills", "docs/specs/skills"])
            .with("repo-profile", ["repo-profile.md"])
            .with("mcp", ["mcp.md"])
            .with("decision-log", ["decision-log.md"])
            .with("specs", ["docs/specs"])
            .with("context", ["docs/context"])
            .with("memory", ["docs/memory"])
    }

    pub fn with<I, S>(mut self, component: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.paths
            .insert(component.into(), paths.into_iter().map(Into::into).collect());
        self
    }

    pub fn paths_for(&self, component: &str) -> Option<&[String]> {
        self.paths.get(component).map(Vec::as_slice)
    }
}

/// Files gathered for a component selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackSourceResult {
    pub files: Vec<PackFile>,
    pub warnings: Vec<String>,
}

/// Relative paths of every file under `relative`, sorted.
fn collect_files(root: &NormalizedPath, relative: &str, out: &mut Vec<String>) -> Result<()> {
    let absolute = root.join(relative);
    if absolute.is_file() {
        out.push(NormalizedPath::new(relative).as_str().to_string());
        return Ok(());
    }
    if !absolute.is_dir() {
        if absolute.exists() {
            return Err(Error::UnreadableSource {
                path: absolute.to_native(),
            });
        }
        return Ok(());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(absolute.to_native())? {
        names.push(entry?.file_name().to_string_lossy().into_owned());
    }
    names.sort();

    for name in names {
        let child = NormalizedPath::new(relative).join(&name);
        let child_absolute = root.join(child.as_str());
        if child_absolute.is_dir() || child_absolute.is_file() {
            collect_files(root, child.as_str(), out)?;
        }
    }
    Ok(())
}

/// Load the pack files for `components` from `source_root`.
///
/// Components are processed in the order given. A file reached through
/// more than one component is returned once, for the first component that
/// reached it.
///
/// # Errors
///
/// Returns an error when a mapped file cannot be read.
pub fn load_pack_source<S: AsRef<str>>(
    source_root: &NormalizedPath,
    components: &[S],
    mapping: &SourceMapping,
) -> Result<PackSourceResult> {
    let mut result = PackSourceResult::default();
    let mut seen = BTreeSet::new();

    for component in components {
        let component = component.as_ref();
        let Some(paths) = mapping.paths_for(component) else {
            result
                .warnings
                .push(format!("Unknown component mapping for {component}"));
            continue;
        };

        let mut matched = false;
        for relative in paths {
            let mut collected = Vec::new();
            collect_files(source_root, relative, &mut collected)?;
            matched |= !collected.is_empty();

            for path in collected {
                if !seen.insert(path.clone()) {
                    tracing::trace!(%path, component, "already collected");
                    continue;
                }
                let content = io::read_text(&source_root.join(&path))?;
                result.files.push(PackFile::new(path, content));
            }
        }

        if !matched {
            result
                .warnings
                .push(format!("No source files found for component {component}"));
        }
    }

    tracing::debug!(
        root = %source_root,
        files = result.files.len(),
        warnings = result.warnings.len(),
        "loaded pack source"
    );
    Ok(result)
}
