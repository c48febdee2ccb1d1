use std::collections::{BTreeMap, BTreeSet};

use taint_engine_core::model::target::Target;

use crate::constraint::Constraint;

/// A two-level `kind -> name -> set<Target>` map populated by write-to-cache
/// queries and consulted by `ReadFromCache` leaves in later queries. Merging
/// two caches is pointwise set union at the leaf.
#[derive(Clone, Debug, Default)]
pub struct ReadWriteCache {
    entries: BTreeMap<String, BTreeMap<String, BTreeSet<Target>>>,
}

impl ReadWriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: impl Into<String>, name: impl Into<String>, target: Target) {
        self.entries
            .entry(kind.into())
            .or_default()
            .entry(name.into())
            .or_default()
            .insert(target);
    }

    pub fn get(&self, kind: &str, name: &str) -> BTreeSet<Target> {
        self.entries
            .get(kind)
            .and_then(|by_name| by_name.get(name))
            .cloned()
            .unwrap_or_default()
    }

    pub fn contains(&self, kind: &str, name: &str, target: &Target) -> bool {
        self.entries
            .get(kind)
            .and_then(|by_name| by_name.get(name))
            .is_some_and(|targets| targets.contains(target))
    }

    pub fn merge(&mut self, other: Self) {
        for (kind, by_name) in other.entries {
            let slot = self.entries.entry(kind).or_default();
            for (name, targets) in by_name {
                slot.entry(name).or_default().extend(targets);
            }
        }
    }
}

/// The lattice a read-from-cache query's `where` clause is evaluated into:
/// `Top` means "no cache-derived restriction" (the clause matched against
/// everything), `Set` is the concrete candidate set a `ReadFromCache` leaf
/// or a conjunction/disjunction of them produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateTargetsFromCache {
    Top,
    Set(BTreeSet<Target>),
}

impl CandidateTargetsFromCache {
    pub fn bottom() -> Self {
        Self::Set(BTreeSet::new())
    }

    pub fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Top, other) => other.clone(),
            (this, Self::Top) => this.clone(),
            (Self::Set(a), Self::Set(b)) => Self::Set(a.intersection(b).cloned().collect()),
        }
    }

    pub fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Top, _) | (_, Self::Top) => Self::Top,
            (Self::Set(a), Self::Set(b)) => Self::Set(a.union(b).cloned().collect()),
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Self::Top)
    }

    /// Evaluates a constraint into the lattice: `ReadFromCache` leaves
    /// become concrete sets, `AllOf`/`AnyOf` meet/join their members, `Not`
    /// and every other leaf kind carry no cache-derived information and
    /// evaluate to `Top`.
    pub fn from_constraint(cache: &ReadWriteCache, constraint: &Constraint) -> Self {
        match constraint {
            Constraint::ReadFromCache { kind, name } => Self::Set(cache.get(kind, name)),
            Constraint::AllOf(items) => items
                .iter()
                .map(|item| Self::from_constraint(cache, item))
                .fold(Self::Top, |acc, next| acc.meet(&next)),
            Constraint::AnyOf(items) => items
                .iter()
                .map(|item| Self::from_constraint(cache, item))
                .fold(Self::bottom(), |acc, next| acc.join(&next)),
            _ => Self::Top,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CandidateTargetsFromCache, ReadWriteCache};
    use crate::constraint::{Constraint, NameConstraint};
    use taint_engine_core::model::target::Target;

    fn function(name: &str) -> Target {
        Target::Function { name: name.to_string() }
    }

    #[test]
    fn get_returns_empty_for_an_unknown_kind() {
        let cache = ReadWriteCache::new();
        assert!(cache.get("source", "tagged").is_empty());
    }

    #[test]
    fn merge_unions_targets_under_the_same_kind_and_name() {
        let mut a = ReadWriteCache::new();
        a.insert("source", "tagged", function("f"));
        let mut b = ReadWriteCache::new();
        b.insert("source", "tagged", function("g"));
        a.merge(b);
        assert_eq!(a.get("source", "tagged").len(), 2);
    }

    #[test]
    fn all_of_over_two_cache_reads_intersects() {
        let mut cache = ReadWriteCache::new();
        cache.insert("source", "tagged", function("f"));
        cache.insert("source", "tagged", function("g"));
        cache.insert("sink", "tagged", function("g"));

        let constraint = Constraint::AllOf(vec![
            Constraint::ReadFromCache { kind: "source".to_string(), name: "tagged".to_string() },
            Constraint::ReadFromCache { kind: "sink".to_string(), name: "tagged".to_string() },
        ]);
        let result = CandidateTargetsFromCache::from_constraint(&cache, &constraint);
        assert_eq!(result, CandidateTargetsFromCache::Set([function("g")].into_iter().collect()));
    }

    #[test]
    fn a_non_cache_leaf_evaluates_to_top() {
        let cache = ReadWriteCache::new();
        let constraint = Constraint::Name(NameConstraint::Equals("f".to_string()));
        assert!(CandidateTargetsFromCache::from_constraint(&cache, &constraint).is_top());
    }

    #[test]
    fn meet_with_top_is_identity() {
        let set = CandidateTargetsFromCache::Set([function("f")].into_iter().collect());
        assert_eq!(set.meet(&CandidateTargetsFromCache::Top), set);
    }
}
