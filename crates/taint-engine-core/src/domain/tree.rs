use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use taint_engine_sdk::{BackwardTaint as BackwardTaintSide, ForwardTaint as ForwardTaintSide};
use taint_engine_sdk::{TaintSide, TaintTree as TaintTreeTrait};

use crate::domain::frame::Frame;
use crate::domain::kind::Kind;

/// One projection step of an access path: a field name or a subscript
/// index. Ordered so access paths sort deterministically.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum AccessStep {
    Field(String),
    Index(u32),
}

pub type AccessPath = Vec<AccessStep>;

/// The concrete in-memory representation of one side of a flow: a set of
/// (kind, frame) pairs, frames grouped by kind. This is the reference
/// implementation of `taint_engine_sdk::TaintSide`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct KindFrameMap {
    entries: BTreeMap<Kind, Vec<Frame>>,
}

impl KindFrameMap {
    fn join_in_place(&mut self, other: &Self) {
        for (kind, frames) in &other.entries {
            self.entries.entry(kind.clone()).or_default().extend(frames.iter().cloned());
        }
    }

    fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.entries.values().flatten()
    }
}

impl TaintSide for KindFrameMap {
    type Kind = Kind;
    type Leaf = Frame;

    fn bottom() -> Self {
        Self::default()
    }

    fn is_bottom(&self) -> bool {
        self.entries.is_empty()
    }

    fn join(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.join_in_place(other);
        result
    }

    fn singleton(kind: Self::Kind, leaf: Self::Leaf) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(kind, vec![leaf]);
        Self { entries }
    }

    fn kinds(&self) -> Vec<Self::Kind> {
        self.entries.keys().cloned().collect()
    }

    fn partition(&self) -> BTreeMap<Self::Kind, Self> {
        self.entries
            .iter()
            .map(|(kind, frames)| {
                let mut entries = BTreeMap::new();
                entries.insert(kind.clone(), frames.clone());
                (kind.clone(), Self { entries })
            })
            .collect()
    }

    fn fold<Acc>(&self, init: Acc, mut f: impl FnMut(Acc, &Self::Kind, &Self::Leaf) -> Acc) -> Acc {
        let mut acc = init;
        for (kind, frames) in &self.entries {
            for frame in frames {
                acc = f(acc, kind, frame);
            }
        }
        acc
    }

    fn transform(&self, f: impl Fn(&Self::Kind, &Self::Leaf) -> (Self::Kind, Self::Leaf)) -> Self {
        let mut result = Self::bottom();
        for (kind, frames) in &self.entries {
            for frame in frames {
                let (new_kind, new_frame) = f(kind, frame);
                result.join_in_place(&Self::singleton(new_kind, new_frame));
            }
        }
        result
    }

    fn sanitize_taint_kinds(&self, sanitized: &BTreeSet<Self::Kind>) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(kind, _)| !sanitized.contains(kind))
                .map(|(kind, frames)| (kind.clone(), frames.clone()))
                .collect(),
        }
    }

    fn joined_breadcrumbs(&self) -> BTreeSet<String> {
        self.frames().flat_map(|frame| frame.breadcrumbs.iter().cloned()).collect()
    }

    fn first_indices(&self) -> BTreeSet<String> {
        self.frames().filter_map(|frame| frame.first_index.clone()).collect()
    }

    fn first_fields(&self) -> BTreeSet<String> {
        self.frames().filter_map(|frame| frame.first_field.clone()).collect()
    }
}

macro_rules! taint_side_wrapper {
    ($name:ident, $marker:path) => {
        #[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub KindFrameMap);

        impl TaintSide for $name {
            type Kind = Kind;
            type Leaf = Frame;

            fn bottom() -> Self {
                Self(KindFrameMap::bottom())
            }

            fn is_bottom(&self) -> bool {
                self.0.is_bottom()
            }

            fn join(&self, other: &Self) -> Self {
                Self(self.0.join(&other.0))
            }

            fn singleton(kind: Self::Kind, leaf: Self::Leaf) -> Self {
                Self(KindFrameMap::singleton(kind, leaf))
            }

            fn kinds(&self) -> Vec<Self::Kind> {
                self.0.kinds()
            }

            fn partition(&self) -> BTreeMap<Self::Kind, Self> {
                self.0
                    .partition()
                    .into_iter()
                    .map(|(kind, side)| (kind, Self(side)))
                    .collect()
            }

            fn fold<Acc>(&self, init: Acc, f: impl FnMut(Acc, &Self::Kind, &Self::Leaf) -> Acc) -> Acc {
                self.0.fold(init, f)
            }

            fn transform(&self, f: impl Fn(&Self::Kind, &Self::Leaf) -> (Self::Kind, Self::Leaf)) -> Self {
                Self(self.0.transform(f))
            }

            fn sanitize_taint_kinds(&self, sanitized: &BTreeSet<Self::Kind>) -> Self {
                Self(self.0.sanitize_taint_kinds(sanitized))
            }

            fn joined_breadcrumbs(&self) -> BTreeSet<String> {
                self.0.joined_breadcrumbs()
            }

            fn first_indices(&self) -> BTreeSet<String> {
                self.0.first_indices()
            }

            fn first_fields(&self) -> BTreeSet<String> {
                self.0.first_fields()
            }
        }

        impl $marker for $name {}
    };
}

taint_side_wrapper!(ForwardTaint, ForwardTaintSide);
taint_side_wrapper!(BackwardTaint, BackwardTaintSide);

/// A trie over access paths. Each node holds a side value; `read` joins
/// every ancestor's content down to (and including) the requested path, so
/// a taint attached at a prefix field still taints every deeper
/// projection of it — this is what makes
/// `read(P, join(T1, T2)) == join(read(P, T1), read(P, T2))` hold.
#[derive(Clone, Debug)]
pub struct Tree<S: TaintSide> {
    content: S,
    children: BTreeMap<AccessStep, Tree<S>>,
}

impl<S: TaintSide> Default for Tree<S> {
    fn default() -> Self {
        Self {
            content: S::bottom(),
            children: BTreeMap::new(),
        }
    }
}

impl<S: TaintSide<Leaf = Frame>> TaintTreeTrait for Tree<S> {
    type Side = S;
    type Step = AccessStep;

    fn is_empty(&self) -> bool {
        self.content.is_bottom() && self.children.values().all(Tree::is_empty)
    }

    fn read(&self, path: &[Self::Step]) -> Self::Side {
        let mut acc = self.content.join(&S::bottom());
        let mut current = self;
        for step in path {
            match current.children.get(step) {
                Some(child) => {
                    acc = acc.join(&child.content);
                    current = child;
                }
                None => break,
            }
        }
        acc
    }

    fn collapse(&self, breadcrumbs: &BTreeSet<String>) -> Self::Side {
        let collapsed = self.collapse_plain();
        if breadcrumbs.is_empty() {
            collapsed
        } else {
            widen_with_breadcrumbs(&collapsed, breadcrumbs)
        }
    }

    fn create_leaf(side: Self::Side) -> Self {
        Self {
            content: side,
            children: BTreeMap::new(),
        }
    }

    fn join(&self, other: &Self) -> Self {
        let content = self.content.join(&other.content);
        let mut children = self.children.clone();
        for (step, other_child) in &other.children {
            children
                .entry(step.clone())
                .and_modify(|child| *child = child.join(other_child))
                .or_insert_with(|| other_child.clone());
        }
        Self { content, children }
    }

    fn fold_leaf_paths<Acc>(
        &self,
        init: Acc,
        mut f: impl FnMut(Acc, &[Self::Step], &Self::Side) -> Acc,
    ) -> Acc {
        let mut path = Vec::new();
        self.fold_leaf_paths_inner(init, &mut path, &mut f)
    }
}

impl<S: TaintSide> Tree<S> {
    pub fn at_path(&mut self, path: &[AccessStep], side: S) {
        let mut current = self;
        for step in path {
            current = current.children.entry(step.clone()).or_default();
        }
        current.content = current.content.join(&side);
    }

    fn fold_leaf_paths_inner<Acc>(
        &self,
        init: Acc,
        path: &mut Vec<AccessStep>,
        f: &mut impl FnMut(Acc, &[AccessStep], &S) -> Acc,
    ) -> Acc {
        let mut acc = if self.content.is_bottom() {
            init
        } else {
            f(init, path, &self.content)
        };
        for (step, child) in &self.children {
            path.push(step.clone());
            acc = child.fold_leaf_paths_inner(acc, path, f);
            path.pop();
        }
        acc
    }
}

impl<S: TaintSide<Leaf = Frame>> Tree<S> {
    /// Post-order join of every node's content, with no breadcrumb widening.
    fn collapse_plain(&self) -> S {
        let mut acc = self.content.join(&S::bottom());
        for child in self.children.values() {
            acc = acc.join(&child.collapse_plain());
        }
        acc
    }

    /// The node reached by following `path` from the root, if every step is
    /// present; `None` once a step has no matching child.
    pub fn subtree_at(&self, path: &[AccessStep]) -> Option<&Self> {
        let mut current = self;
        for step in path {
            current = current.children.get(step)?;
        }
        Some(current)
    }
}

/// Merges `breadcrumbs` into every leaf's recorded breadcrumb list, widening
/// a collapsed side with the configured set.
fn widen_with_breadcrumbs<S: TaintSide<Leaf = Frame>>(side: &S, breadcrumbs: &BTreeSet<String>) -> S {
    side.transform(|kind, frame| {
        let mut frame = frame.clone();
        for crumb in breadcrumbs {
            if !frame.breadcrumbs.contains(crumb) {
                frame.breadcrumbs.push(crumb.clone());
            }
        }
        (kind.clone(), frame)
    })
}
