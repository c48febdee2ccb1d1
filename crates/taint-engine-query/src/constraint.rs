use std::collections::BTreeMap;

/// Matches a modelable's name or fully-qualified name. `Matches` captures
/// regex sub-groups into the per-query name-captures buffer during
/// write-to-cache execution; `Equals` never captures.
#[derive(Clone, Debug)]
pub enum NameConstraint {
    Equals(String),
    Matches(String),
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DecoratorArguments {
    pub positional: Vec<String>,
    pub keyword: BTreeMap<String, String>,
}

/// `Contains` requires every keyword arg in `self` to be present in the
/// decorator's keyword args and `self`'s positional args to be an
/// order-preserving prefix of the decorator's. `Equals` requires both sides
/// equal up to identifier-sanitization (whitespace-trimmed comparison).
#[derive(Clone, Debug)]
pub enum ArgumentsConstraint {
    Contains(DecoratorArguments),
    Equals(DecoratorArguments),
}

/// `Extends.includes_self` matches the target class itself; `transitive`
/// walks the full ancestor chain through the resolver rather than just the
/// declared immediate bases. `AnyChild` is the mirror image over the
/// class-hierarchy graph's children.
#[derive(Clone, Debug)]
pub enum ClassConstraint {
    Extends {
        class: String,
        transitive: bool,
        includes_self: bool,
    },
    AnyChild {
        class: String,
        transitive: bool,
        includes_self: bool,
    },
}

/// The closed constraint algebra a query's `where` clause is built from.
#[derive(Clone, Debug)]
pub enum Constraint {
    AnyOf(Vec<Constraint>),
    AllOf(Vec<Constraint>),
    Not(Box<Constraint>),
    Name(NameConstraint),
    FullyQualifiedName(NameConstraint),
    Annotation(NameConstraint),
    Return(NameConstraint),
    AnyParameter(NameConstraint),
    AnyDecorator(NameConstraint, Option<ArgumentsConstraint>),
    Class(ClassConstraint),
    ReadFromCache { kind: String, name: String },
}

impl Constraint {
    /// True iff a `ReadFromCache` leaf appears anywhere in the tree.
    pub fn references_read_from_cache(&self) -> bool {
        match self {
            Self::ReadFromCache { .. } => true,
            Self::Not(inner) => inner.references_read_from_cache(),
            Self::AnyOf(items) | Self::AllOf(items) => {
                items.iter().any(Constraint::references_read_from_cache)
            }
            _ => false,
        }
    }
}
