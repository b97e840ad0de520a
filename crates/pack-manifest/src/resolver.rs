//! Expansion of a component selection into a dependency-closed set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::graph::ComponentGraph;
use crate::manifest::PackManifest;

/// Warning reported when the selection is empty.
pub const EMPTY_SELECTION_WARNING: &str = "No components selected; exiting gracefully.";

/// Outcome of resolving a component selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    /// Sorted install set. `None` whenever `errors` is non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<Vec<String>>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub empty_selection: bool,
}

impl SelectionResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

struct Visitor<'a> {
    graph: &'a ComponentGraph,
    resolved: BTreeSet<&'a str>,
    visiting: BTreeSet<&'a str>,
    errors: Vec<String>,
}

impl<'a> Visitor<'a> {
    /// Entry point for requested names, which do not borrow from the graph.
    fn visit_requested(&mut self, name: &str) {
        let graph = self.graph;
        match graph.key(name) {
            Some(key) => self.visit(key),
            None => self.errors.push(format!("Unknown component: {name}")),
        }
    }

    fn visit(&mut self, name: &'a str) {
        if self.resolved.contains(name) {
            return;
        }
        if self.visiting.contains(name) {
            self.errors
                .push(format!("Circular dependency detected at {name}"));
            return;
        }
        if !self.graph.contains(name) {
            self.errors.push(format!("Unknown component: {name}"));
            return;
        }

        let graph = self.graph;
        self.visiting.insert(name);
        for dep in graph.dependencies_of(name) {
            self.visit(dep);
        }
        self.visiting.remove(name);
        self.resolved.insert(name);
    }
}

/// Resolve `selected` against `manifest`.
///
/// Every requested name is expanded depth-first so the result contains
/// all transitive requirements. Unknown names and cycles are collected as
/// errors across all requested names instead of stopping at the first.
/// The output is sorted by name; use
/// [`ComponentGraph::install_order`] when positional ordering matters.
///
/// # Example
///
/// ```
/// use pack_manifest::{PackComponent, PackManifest, resolve_components};
///
/// let manifest = PackManifest::new(vec![
///     PackComponent::new("instructions"),
///     PackComponent::requiring("prompts", ["instructions"]),
///     PackComponent::requiring("skills", ["prompts"]),
/// ]);
///
/// let result = resolve_components(&manifest, &["skills"]);
/// assert_eq!(
///     result.resolved.unwrap(),
///     vec!["instructions", "prompts", "skills"]
/// );
/// ```
pub fn resolve_components<S: AsRef<str>>(manifest: &PackManifest, selected: &[S]) -> SelectionResult {
    if selected.is_empty() {
        return SelectionResult {
            resolved: Some(Vec::new()),
            errors: Vec::new(),
            warnings: vec![EMPTY_SELECTION_WARNING.to_string()],
            empty_selection: true,
        };
    }

    let graph = ComponentGraph::from_manifest(manifest);
    let warnings: Vec<String> = graph
        .duplicates()
        .iter()
        .map(|name| format!("Duplicate component declaration: {name}"))
        .collect();

    let mut visitor = Visitor {
        graph: &graph,
        resolved: BTreeSet::new(),
        visiting: BTreeSet::new(),
        errors: Vec::new(),
    };
    for name in selected {
        visitor.visit_requested(name.as_ref());
    }

    let Visitor {
        resolved, errors, ..
    } = visitor;
    tracing::debug!(
        selected = selected.len(),
        resolved = resolved.len(),
        errors = errors.len(),
        "resolved component selection"
    );

    SelectionResult {
        resolved: errors
            .is_empty()
            .then(|| resolved.into_iter().map(str::to_string).collect()),
        errors,
        warnings,
        empty_selection: false,
    }
}
