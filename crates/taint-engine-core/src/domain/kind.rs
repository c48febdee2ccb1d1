use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The pair of sanitize-transform sets a kind optionally carries: the set
/// of source kinds this kind sanitizes, and the set of sink kinds it
/// sanitizes. Disjoint by construction — a kind never sanitizes itself as
/// both a source and a sink in one transform pair.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct SanitizeTransforms {
    pub sanitized_sources: BTreeSet<String>,
    pub sanitized_sinks: BTreeSet<String>,
}

impl SanitizeTransforms {
    pub fn is_empty(&self) -> bool {
        self.sanitized_sources.is_empty() && self.sanitized_sinks.is_empty()
    }
}

/// An opaque identifier for a source or sink type, e.g. `UserControlled`.
///
/// Two kinds are equal iff every component is equal — `name`, `subkind`,
/// `sanitize_transforms`, and `named_transforms` all participate.
#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Kind {
    pub name: String,
    pub subkind: Option<String>,
    pub sanitize_transforms: SanitizeTransforms,
    pub named_transforms: Vec<String>,
}

impl Kind {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subkind: None,
            sanitize_transforms: SanitizeTransforms::default(),
            named_transforms: Vec::new(),
        }
    }

    pub fn with_subkind(mut self, subkind: impl Into<String>) -> Self {
        self.subkind = Some(subkind.into());
        self
    }

    pub fn with_sanitize_transforms(mut self, transforms: SanitizeTransforms) -> Self {
        self.sanitize_transforms = transforms;
        self
    }

    pub fn with_named_transforms(mut self, transforms: Vec<String>) -> Self {
        self.named_transforms = transforms;
        self
    }

    pub fn discard_subkind(&self) -> Self {
        Self {
            subkind: None,
            ..self.clone()
        }
    }

    pub fn discard_transforms(&self) -> Self {
        Self {
            sanitize_transforms: SanitizeTransforms::default(),
            named_transforms: Vec::new(),
            ..self.clone()
        }
    }

    pub fn discard_sanitize_transforms(&self) -> Self {
        Self {
            sanitize_transforms: SanitizeTransforms::default(),
            ..self.clone()
        }
    }

    pub fn extract_sanitize_transforms(&self) -> SanitizeTransforms {
        self.sanitize_transforms.clone()
    }

    pub fn get_named_transforms(&self) -> &[String] {
        &self.named_transforms
    }

    pub fn contains_sanitize_transforms(&self) -> bool {
        !self.sanitize_transforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Kind, SanitizeTransforms};

    #[test]
    fn kinds_with_different_subkinds_are_not_equal() {
        let a = Kind::new("UserControlled").with_subkind("header");
        let b = Kind::new("UserControlled").with_subkind("body");
        assert_ne!(a, b);
    }

    #[test]
    fn discard_subkind_clears_only_subkind() {
        let kind = Kind::new("UserControlled")
            .with_subkind("header")
            .with_named_transforms(vec!["decode".to_string()]);
        let discarded = kind.discard_subkind();
        assert_eq!(discarded.subkind, None);
        assert_eq!(discarded.named_transforms, vec!["decode".to_string()]);
    }

    #[test]
    fn discard_sanitize_transforms_keeps_named_transforms() {
        let mut transforms = SanitizeTransforms::default();
        transforms.sanitized_sinks.insert("SqlInjection".to_string());
        let kind = Kind::new("UserControlled")
            .with_sanitize_transforms(transforms)
            .with_named_transforms(vec!["decode".to_string()]);

        assert!(kind.contains_sanitize_transforms());
        let discarded = kind.discard_sanitize_transforms();
        assert!(!discarded.contains_sanitize_transforms());
        assert_eq!(discarded.named_transforms, vec!["decode".to_string()]);
    }

    #[test]
    fn extract_sanitize_transforms_returns_a_copy() {
        let mut transforms = SanitizeTransforms::default();
        transforms.sanitized_sources.insert("EnvVar".to_string());
        let kind = Kind::new("Sanitizer").with_sanitize_transforms(transforms.clone());
        assert_eq!(kind.extract_sanitize_transforms(), transforms);
    }
}
