use std::collections::BTreeMap;

use regex::Regex;
use taint_engine_sdk::{ClassHierarchyGraph, GlobalResolver, Modelable};

use crate::cache::ReadWriteCache;
use crate::constraint::{ArgumentsConstraint, ClassConstraint, Constraint, NameConstraint};

/// Regex sub-groups captured while matching `NameConstraint::Matches`
/// against a target, keyed by the target's fully-qualified name. Only
/// populated meaningfully during write-to-cache execution; read and
/// regular queries may still populate it but nothing consumes the result.
#[derive(Clone, Debug, Default)]
pub struct NameCaptures {
    by_target: BTreeMap<String, Vec<String>>,
}

impl NameCaptures {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups_for(&self, target: &str) -> &[String] {
        self.by_target.get(target).map(Vec::as_slice).unwrap_or(&[])
    }

    fn record(&mut self, target: &str, groups: Vec<String>) {
        self.by_target.insert(target.to_string(), groups);
    }
}

fn name_matches(constraint: &NameConstraint, value: &str, target_key: &str, captures: &mut NameCaptures) -> bool {
    match constraint {
        NameConstraint::Equals(expected) => value == expected,
        NameConstraint::Matches(pattern) => match Regex::new(pattern) {
            Ok(regex) => match regex.captures(value) {
                Some(found) => {
                    let groups = found
                        .iter()
                        .skip(1)
                        .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
                        .collect();
                    captures.record(target_key, groups);
                    true
                }
                None => false,
            },
            Err(_) => false,
        },
    }
}

fn arguments_match(constraint: &ArgumentsConstraint, positional: &[String], keyword: &BTreeMap<String, String>) -> bool {
    match constraint {
        ArgumentsConstraint::Contains(expected) => {
            let prefix_matches = positional.len() >= expected.positional.len()
                && positional[..expected.positional.len()] == expected.positional[..];
            let keyword_subset = expected.keyword.iter().all(|(name, value)| keyword.get(name) == Some(value));
            prefix_matches && keyword_subset
        }
        ArgumentsConstraint::Equals(expected) => {
            positional.iter().map(|s| s.trim()).eq(expected.positional.iter().map(|s| s.trim()))
                && keyword.len() == expected.keyword.len()
                && keyword.iter().all(|(name, value)| expected.keyword.get(name).map(|e| e.trim()) == Some(value.trim()))
        }
    }
}

/// Evaluates `constraint` against `target`. `captures` accumulates regex
/// sub-groups from `NameConstraint::Matches` leaves; `cache` resolves
/// `ReadFromCache` leaves against previously written cache entries.
pub fn matches(
    constraint: &Constraint,
    target: &Modelable,
    resolver: &dyn GlobalResolver,
    hierarchy: &dyn ClassHierarchyGraph,
    cache: &ReadWriteCache,
    captures: &mut NameCaptures,
) -> bool {
    let key = target.fully_qualified_name().to_string();
    match constraint {
        Constraint::AnyOf(items) => items.iter().any(|item| matches(item, target, resolver, hierarchy, cache, captures)),
        Constraint::AllOf(items) => items.iter().all(|item| matches(item, target, resolver, hierarchy, cache, captures)),
        Constraint::Not(inner) => !matches(inner, target, resolver, hierarchy, cache, captures),
        Constraint::Name(name) => name_matches(name, target.name(), &key, captures),
        Constraint::FullyQualifiedName(name) => name_matches(name, target.fully_qualified_name(), &key, captures),
        Constraint::Annotation(name) => {
            let annotation = target.type_annotation().ok().flatten().or_else(|| target.return_annotation().ok().flatten());
            annotation.is_some_and(|value| name_matches(name, value, &key, captures))
        }
        Constraint::Return(name) => target
            .return_annotation()
            .ok()
            .flatten()
            .is_some_and(|value| name_matches(name, value, &key, captures)),
        Constraint::AnyParameter(name) => target.parameters().map(|parameters| {
            parameters.iter().any(|parameter| {
                name_matches(name, &parameter.name, &key, captures)
                    || parameter.annotation.as_deref().is_some_and(|annotation| name_matches(name, annotation, &key, captures))
            })
        }).unwrap_or(false),
        Constraint::AnyDecorator(name, arguments) => target.decorators().map(|decorators| {
            decorators.iter().any(|decorator| {
                name_matches(name, &decorator.name, &key, captures)
                    && arguments.as_ref().is_none_or(|constraint| {
                        arguments_match(constraint, &decorator.positional_args, &decorator.keyword_args)
                    })
            })
        }).unwrap_or(false),
        Constraint::Class(class_constraint) => class_matches(class_constraint, target, resolver, hierarchy),
        Constraint::ReadFromCache { .. } => true,
    }
}

fn class_matches(constraint: &ClassConstraint, target: &Modelable, resolver: &dyn GlobalResolver, hierarchy: &dyn ClassHierarchyGraph) -> bool {
    let Ok(Some(class_name)) = target.class_name() else {
        return false;
    };

    match constraint {
        ClassConstraint::Extends { class, transitive, includes_self } => {
            if *includes_self && class_name == class {
                return true;
            }
            if *transitive {
                resolver.is_transitive_successor(class_name, class)
            } else {
                resolver.class_summary(class_name).is_some_and(|summary| summary.bases.iter().any(|base| base == class))
            }
        }
        ClassConstraint::AnyChild { class, transitive, includes_self } => {
            if *transitive {
                hierarchy.is_transitive_child(class, class_name, *includes_self)
            } else {
                (*includes_self && class_name == class) || hierarchy.get_children(class).contains(class_name)
            }
        }
    }
}
