use std::collections::BTreeSet;

/// The class-hierarchy graph, owned by the host's type resolver. An
/// `Untracked` ancestry query (§7) is never fatal to the caller: it is
/// represented here simply as an empty children set, and callers treat
/// "not found" the same as "found, no children" — ancestry queries on an
/// unknown class resolve to `false`, never to an error.
pub trait ClassHierarchyGraph {
    /// Direct children (immediate subclasses) of `class`, or empty if
    /// `class` is untracked.
    fn get_children(&self, class: &str) -> BTreeSet<String>;

    /// Reflexive/transitive children of `class`, computed via `get_children`.
    fn transitive_children(&self, class: &str, includes_self: bool) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut frontier = vec![class.to_string()];
        if includes_self {
            seen.insert(class.to_string());
        }
        while let Some(current) = frontier.pop() {
            for child in self.get_children(&current) {
                if seen.insert(child.clone()) {
                    frontier.push(child);
                }
            }
        }
        seen
    }

    /// True iff `descendant` is reachable from `ancestor` through
    /// `get_children`, optionally counting `ancestor == descendant` as a
    /// match (`includes_self`).
    fn is_transitive_child(&self, ancestor: &str, descendant: &str, includes_self: bool) -> bool {
        if includes_self && ancestor == descendant {
            return true;
        }
        self.transitive_children(ancestor, false).contains(descendant)
    }
}

/// An in-memory class hierarchy, useful for hosts assembling a graph from a
/// resolved source map and for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticClassHierarchy {
    children: std::collections::BTreeMap<String, BTreeSet<String>>,
}

impl StaticClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edge(mut self, parent: impl Into<String>, child: impl Into<String>) -> Self {
        self.children
            .entry(parent.into())
            .or_default()
            .insert(child.into());
        self
    }
}

impl ClassHierarchyGraph for StaticClassHierarchy {
    fn get_children(&self, class: &str) -> BTreeSet<String> {
        self.children.get(class).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{ClassHierarchyGraph, StaticClassHierarchy};

    fn sample() -> StaticClassHierarchy {
        StaticClassHierarchy::new()
            .with_edge("Base", "Mid")
            .with_edge("Mid", "Leaf")
    }

    #[test]
    fn transitive_children_walks_multiple_hops() {
        let graph = sample();
        let children = graph.transitive_children("Base", false);
        assert_eq!(
            children,
            BTreeSet::from(["Mid".to_string(), "Leaf".to_string()])
        );
    }

    #[test]
    fn includes_self_adds_the_root_class() {
        let graph = sample();
        let children = graph.transitive_children("Base", true);
        assert!(children.contains("Base"));
    }

    #[test]
    fn untracked_class_is_not_an_ancestor() {
        let graph = sample();
        assert!(!graph.is_transitive_child("Unknown", "Leaf", false));
        assert!(graph.get_children("Unknown").is_empty());
    }

    #[test]
    fn is_transitive_child_respects_includes_self() {
        let graph = sample();
        assert!(graph.is_transitive_child("Base", "Leaf", false));
        assert!(!graph.is_transitive_child("Leaf", "Leaf", false));
        assert!(graph.is_transitive_child("Leaf", "Leaf", true));
    }
}
