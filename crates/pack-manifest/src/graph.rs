//! Adjacency view of a component manifest.
//!
//! Edges point from dependent to dependency: if `skills` requires
//! `prompts`, the edge is `skills -> prompts`. All maps are ordered so
//! nothing downstream depends on hash iteration order.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::manifest::PackManifest;

/// Name -> required names, built from a manifest without mutating it.
#[derive(Debug, Clone, Default)]
pub struct ComponentGraph {
    edges: BTreeMap<String, Vec<String>>,
    duplicates: Vec<String>,
}

impl ComponentGraph {
    /// Build the graph from a manifest.
    ///
    /// When a name is declared more than once the first declaration wins
    /// and the name is recorded in [`duplicates`](Self::duplicates).
    pub fn from_manifest(manifest: &PackManifest) -> Self {
        let mut graph = Self::default();
        for component in &manifest.components {
            if graph.edges.contains_key(&component.name) {
                graph.duplicates.push(component.name.clone());
                continue;
            }
            graph
                .edges
                .insert(component.name.clone(), component.requires.clone());
        }
        graph
    }

    pub fn contains(&self, name: &str) -> bool {
        self.edges.contains_key(name)
    }

    /// The graph's own copy of a declared name.
    pub(crate) fn key(&self, name: &str) -> Option<&str> {
        self.edges.get_key_value(name).map(|(key, _)| key.as_str())
    }

    /// Direct requirements of a component, in declaration order.
    ///
    /// Unknown names have no requirements.
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.edges.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Names declared more than once, in the order the repeats appeared.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    /// Order a set of component names so that every dependency precedes
    /// its dependents (Kahn's algorithm, alphabetical among ready nodes).
    ///
    /// Requirements outside `names` are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::DependencyCycle` if the set contains a cycle.
    pub fn install_order<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<String>> {
        let members: BTreeSet<&str> = names.iter().map(|name| name.as_ref()).collect();

        let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for &name in &members {
            let deps: BTreeSet<&str> = self
                .dependencies_of(name)
                .iter()
                .map(String::as_str)
                .filter(|dep| members.contains(dep))
                .collect();
            pending.insert(name, deps.len());
            for dep in deps {
                dependents.entry(dep).or_default().push(name);
            }
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(members.len());

        while let Some(current) = ready.pop_first() {
            order.push(current.to_string());
            for &dependent in dependents.get(current).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != members.len() {
            let participants = pending
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(Error::DependencyCycle { participants });
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::PackComponent;

    fn manifest(components: Vec<PackComponent>) -> PackManifest {
        PackManifest::new(components)
    }

    #[test]
    fn test_empty_graph() {
        let graph = ComponentGraph::default();
        assert!(graph.dependencies_of("anything").is_empty());
        let order = graph.install_order::<&str>(&[]).unwrap();
        assert!(order.is_empty());
    }

    #[test]
    fn test_linear_chain() {
        let graph = ComponentGraph::from_manifest(&manifest(vec![
            PackComponent::requiring("skills", ["prompts"]),
            PackComponent::requiring("prompts", ["instructions"]),
            PackComponent::new("instructions"),
        ]));

        let order = graph
            .install_order(&["skills", "prompts", "instructions"])
            .unwrap();
        assert_eq!(order, vec!["instructions", "prompts", "skills"]);
    }

    #[test]
    fn test_diamond_dependency() {
        let graph = ComponentGraph::from_manifest(&manifest(vec![
            PackComponent::new("base"),
            PackComponent::requiring("left", ["base"]),
            PackComponent::requiring("right", ["base"]),
            PackComponent::requiring("top", ["right", "left"]),
        ]));

        let order = graph
            .install_order(&["top", "right", "left", "base"])
            .unwrap();
        assert_eq!(order, vec!["base", "left", "right", "top"]);
    }

    #[test]
    fn test_dependency_first_beats_alphabetical() {
        let graph = ComponentGraph::from_manifest(&manifest(vec![
            PackComponent::requiring("a", ["z"]),
            PackComponent::new("z"),
        ]));

        assert_eq!(graph.install_order(&["a", "z"]).unwrap(), vec!["z", "a"]);
    }

    #[test]
    fn test_cycle_detected() {
        let graph = ComponentGraph::from_manifest(&manifest(vec![
            PackComponent::requiring("a", ["b"]),
            PackComponent::requiring("b", ["a"]),
            PackComponent::new("c"),
        ]));

        let err = graph.install_order(&["a", "b", "c"]).unwrap_err();
        match err {
            Error::DependencyCycle { participants } => assert_eq!(participants, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_first_declaration_wins() {
        let graph = ComponentGraph::from_manifest(&manifest(vec![
            PackComponent::new("a"),
            PackComponent::requiring("a", ["b"]),
        ]));

        assert!(graph.dependencies_of("a").is_empty());
        assert_eq!(graph.duplicates(), ["a".to_string()]);
    }

    #[test]
    fn test_dependencies_of_unknown_is_empty() {
        let graph = ComponentGraph::default();
        assert!(graph.dependencies_of("missing").is_empty());
        assert!(!graph.contains("missing"));
    }
}
