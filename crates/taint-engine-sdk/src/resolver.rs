/// A minimal class summary, as produced by the host's type resolver.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClassSummary {
    pub name: String,
    pub bases: Vec<String>,
    pub is_abstract: bool,
}

/// The host's global type/symbol resolver. Out of scope of this crate in
/// the sense that its internals (parsing, type inference) are never
/// implemented here — only the interface the query executor calls through.
pub trait GlobalResolver {
    fn class_summary(&self, class: &str) -> Option<ClassSummary>;
    fn is_transitive_successor(&self, descendant: &str, ancestor: &str) -> bool;
    fn unannotated_global(&self, name: &str) -> bool;
}

/// A resolver backed by a fixed table, for hosts that precompute summaries
/// and for tests.
#[derive(Clone, Debug, Default)]
pub struct StaticResolver {
    classes: std::collections::BTreeMap<String, ClassSummary>,
    unannotated_globals: std::collections::BTreeSet<String>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, summary: ClassSummary) -> Self {
        self.classes.insert(summary.name.clone(), summary);
        self
    }

    pub fn with_unannotated_global(mut self, name: impl Into<String>) -> Self {
        self.unannotated_globals.insert(name.into());
        self
    }
}

impl GlobalResolver for StaticResolver {
    fn class_summary(&self, class: &str) -> Option<ClassSummary> {
        self.classes.get(class).cloned()
    }

    fn is_transitive_successor(&self, descendant: &str, ancestor: &str) -> bool {
        let mut frontier = vec![descendant.to_string()];
        let mut seen = std::collections::BTreeSet::new();
        while let Some(current) = frontier.pop() {
            if current == ancestor {
                return true;
            }
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(summary) = self.classes.get(&current) {
                frontier.extend(summary.bases.iter().cloned());
            }
        }
        false
    }

    fn unannotated_global(&self, name: &str) -> bool {
        self.unannotated_globals.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ClassSummary, GlobalResolver, StaticResolver};

    fn resolver() -> StaticResolver {
        StaticResolver::new()
            .with_class(ClassSummary {
                name: "Child".to_string(),
                bases: vec!["Base".to_string()],
                is_abstract: false,
            })
            .with_class(ClassSummary {
                name: "Base".to_string(),
                bases: vec![],
                is_abstract: true,
            })
            .with_unannotated_global("SOME_GLOBAL")
    }

    #[test]
    fn transitive_successor_walks_base_chain() {
        let resolver = resolver();
        assert!(resolver.is_transitive_successor("Child", "Base"));
        assert!(!resolver.is_transitive_successor("Base", "Child"));
    }

    #[test]
    fn unknown_class_is_not_a_successor_of_anything() {
        let resolver = resolver();
        assert!(!resolver.is_transitive_successor("Unknown", "Base"));
    }

    #[test]
    fn unannotated_global_lookup() {
        let resolver = resolver();
        assert!(resolver.unannotated_global("SOME_GLOBAL"));
        assert!(!resolver.unannotated_global("OTHER"));
    }
}
