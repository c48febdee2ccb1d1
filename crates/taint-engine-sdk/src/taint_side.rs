use std::collections::{BTreeMap, BTreeSet};

/// One side (forward or backward) of a taint domain, as the host's
/// abstract-interpretation engine implements it. The flow matcher and rule
/// engine never construct a concrete lattice themselves — they only call
/// through this trait, so a host can swap in its own representation without
/// touching the rest of the workspace.
pub trait TaintSide: Sized + Clone {
    type Kind: Clone + Ord;
    type Leaf: Clone;

    fn bottom() -> Self;
    fn is_bottom(&self) -> bool;
    fn join(&self, other: &Self) -> Self;
    fn singleton(kind: Self::Kind, leaf: Self::Leaf) -> Self;
    fn kinds(&self) -> Vec<Self::Kind>;

    /// Split into one side per distinct kind, discarding the grouping.
    fn partition(&self) -> BTreeMap<Self::Kind, Self>;

    fn fold<Acc>(&self, init: Acc, f: impl FnMut(Acc, &Self::Kind, &Self::Leaf) -> Acc) -> Acc;

    /// Rewrite every (kind, leaf) pair, joining the results.
    fn transform(&self, f: impl Fn(&Self::Kind, &Self::Leaf) -> (Self::Kind, Self::Leaf)) -> Self;

    /// Drop every (kind, leaf) pair whose kind is in `sanitized`.
    fn sanitize_taint_kinds(&self, sanitized: &BTreeSet<Self::Kind>) -> Self;

    /// Union of every leaf's recorded breadcrumbs across the whole side.
    fn joined_breadcrumbs(&self) -> BTreeSet<String>;

    /// Union of every leaf's first-encountered index-typed access step, one
    /// per leaf that recorded one.
    fn first_indices(&self) -> BTreeSet<String>;

    /// Union of every leaf's first-encountered field-typed access step, one
    /// per leaf that recorded one.
    fn first_fields(&self) -> BTreeSet<String>;
}

/// Marker for the source side of a flow (reachable-from-source taint).
pub trait ForwardTaint: TaintSide {}

/// Marker for the sink side of a flow (reaches-a-sink taint).
pub trait BackwardTaint: TaintSide {}

/// A trie over access paths, each node holding a `TaintSide` value. `read`
/// is upward-closed: it returns the join of every node's content on the
/// path from the root down to (and including) `path`, since a taint
/// attached to a prefix field still taints every projection of it.
pub trait TaintTree: Sized + Clone {
    type Side: TaintSide;
    type Step: Clone + Ord;

    fn is_empty(&self) -> bool;
    fn read(&self, path: &[Self::Step]) -> Self::Side;

    /// Post-order join of every node's content into one flat side value,
    /// widened by merging `breadcrumbs` into every resulting leaf — this is
    /// the configured breadcrumb set a rule engine widens a collapsed
    /// source/sink taint with, recording that precision was lost here.
    fn collapse(&self, breadcrumbs: &BTreeSet<String>) -> Self::Side;
    fn create_leaf(side: Self::Side) -> Self;
    fn join(&self, other: &Self) -> Self;

    /// Visit every node that carries non-bottom content, in path order.
    fn fold_leaf_paths<Acc>(
        &self,
        init: Acc,
        f: impl FnMut(Acc, &[Self::Step], &Self::Side) -> Acc,
    ) -> Acc;
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, BTreeSet};

    use super::{BackwardTaint, ForwardTaint, TaintSide};

    /// A toy taint side good enough to exercise the trait contract in
    /// isolation; the workspace's real domain lives in the core crate.
    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    struct ToySide {
        entries: BTreeMap<&'static str, Vec<u32>>,
    }

    impl TaintSide for ToySide {
        type Kind = &'static str;
        type Leaf = u32;

        fn bottom() -> Self {
            Self::default()
        }

        fn is_bottom(&self) -> bool {
            self.entries.is_empty()
        }

        fn join(&self, other: &Self) -> Self {
            let mut entries = self.entries.clone();
            for (kind, leaves) in &other.entries {
                entries.entry(kind).or_default().extend(leaves.iter().copied());
            }
            Self { entries }
        }

        fn singleton(kind: Self::Kind, leaf: Self::Leaf) -> Self {
            let mut entries = BTreeMap::new();
            entries.insert(kind, vec![leaf]);
            Self { entries }
        }

        fn kinds(&self) -> Vec<Self::Kind> {
            self.entries.keys().copied().collect()
        }

        fn partition(&self) -> BTreeMap<Self::Kind, Self> {
            self.entries
                .iter()
                .map(|(kind, leaves)| {
                    let mut entries = BTreeMap::new();
                    entries.insert(*kind, leaves.clone());
                    (*kind, Self { entries })
                })
                .collect()
        }

        fn fold<Acc>(&self, init: Acc, mut f: impl FnMut(Acc, &Self::Kind, &Self::Leaf) -> Acc) -> Acc {
            let mut acc = init;
            for (kind, leaves) in &self.entries {
                for leaf in leaves {
                    acc = f(acc, kind, leaf);
                }
            }
            acc
        }

        fn transform(&self, f: impl Fn(&Self::Kind, &Self::Leaf) -> (Self::Kind, Self::Leaf)) -> Self {
            let mut out = Self::bottom();
            for (kind, leaves) in &self.entries {
                for leaf in leaves {
                    let (new_kind, new_leaf) = f(kind, leaf);
                    out = out.join(&Self::singleton(new_kind, new_leaf));
                }
            }
            out
        }

        fn sanitize_taint_kinds(&self, sanitized: &BTreeSet<Self::Kind>) -> Self {
            Self {
                entries: self
                    .entries
                    .iter()
                    .filter(|(kind, _)| !sanitized.contains(*kind))
                    .map(|(kind, leaves)| (*kind, leaves.clone()))
                    .collect(),
            }
        }

        // A bare `u32` leaf carries no breadcrumb/access-step data; the real
        // domain in the core crate is the one that populates these.
        fn joined_breadcrumbs(&self) -> BTreeSet<String> {
            BTreeSet::new()
        }

        fn first_indices(&self) -> BTreeSet<String> {
            BTreeSet::new()
        }

        fn first_fields(&self) -> BTreeSet<String> {
            BTreeSet::new()
        }
    }

    impl ForwardTaint for ToySide {}
    impl BackwardTaint for ToySide {}

    #[test]
    fn join_is_commutative_and_bottom_is_identity() {
        let a = ToySide::singleton("UserControlled", 1);
        let b = ToySide::singleton("EnvVar", 2);
        assert_eq!(a.join(&b), b.join(&a));
        assert_eq!(a.join(&ToySide::bottom()), a);
    }

    #[test]
    fn partition_groups_by_kind() {
        let combined = ToySide::singleton("A", 1).join(&ToySide::singleton("B", 2));
        let parts = combined.partition();
        assert_eq!(parts.len(), 2);
        assert!(parts["A"].kinds().iter().all(|k| *k == "A"));
    }

    #[test]
    fn sanitize_taint_kinds_drops_only_named_kinds() {
        let combined = ToySide::singleton("A", 1).join(&ToySide::singleton("B", 2));
        let sanitized = combined.sanitize_taint_kinds(&BTreeSet::from(["A"]));
        assert_eq!(sanitized.kinds(), vec!["B"]);
    }

    #[test]
    fn fold_visits_every_leaf() {
        let combined = ToySide::singleton("A", 1).join(&ToySide::singleton("A", 2));
        let total = combined.fold(0u32, |acc, _, leaf| acc + leaf);
        assert_eq!(total, 3);
    }
}
