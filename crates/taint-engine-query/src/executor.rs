use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

use taint_engine_core::model::target::Target;
use taint_engine_sdk::{
    AttributeIterator, CallableIterator, ClassHierarchyGraph, GlobalIterator, GlobalResolver,
    Modelable, ModelableKind, Scheduler,
};

use crate::cache::{CandidateTargetsFromCache, ReadWriteCache};
use crate::constraint::Constraint;
use crate::matcher::{matches, NameCaptures};
use crate::projector::{project, AnnotatedTaint};
use crate::query::{render_name_template, ModelClause, Query};

/// A fatal configuration inconsistency in a query's bin assignment. Both
/// variants abort the whole query phase rather than being collected
/// alongside `VerificationError`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ConfigError {
    ReadFromCacheEvaluatesToTop { query: String },
    WriteToCacheReferencesCache { query: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadFromCacheEvaluatesToTop { query } => {
                write!(f, "query '{query}' reads from the cache but its where-clause carries no cache-derived restriction at the top level")
            }
            Self::WriteToCacheReferencesCache { query } => {
                write!(f, "query '{query}' writes to the cache but its where-clause also reads from it")
            }
        }
    }
}

impl Error for ConfigError {}

/// A query's `expected_models`/`unexpected_models` assertion failing
/// against what was actually produced. Accumulated across the whole run
/// rather than aborting it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VerificationError {
    ExpectedModelMissing { query: String, model: String },
    UnexpectedModelPresent { query: String, model: String },
}

impl Display for VerificationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExpectedModelMissing { query, model } => write!(f, "query '{query}' never produced expected model '{model}'"),
            Self::UnexpectedModelPresent { query, model } => write!(f, "query '{query}' produced disallowed model '{model}'"),
        }
    }
}

impl Error for VerificationError {}

fn render_model(target: &Target, annotation: &AnnotatedTaint) -> String {
    let kind_label = match annotation {
        AnnotatedTaint::Source { kind, .. } => format!("Source[{}]", kind.name),
        AnnotatedTaint::Sink { kind, .. } => format!("Sink[{}]", kind.name),
        AnnotatedTaint::ViaTypeOf { parameter, .. } => format!("ViaTypeOf[{parameter}]"),
        AnnotatedTaint::ViaValueOf { parameter, .. } => format!("ViaValueOf[{parameter}]"),
    };
    format!("{} -> {kind_label}", target.qualified_name())
}

/// The annotations a target accumulated across every query that matched
/// it. Merging two models for the same target is a plain concatenation —
/// queries are independent productions, not competing claims.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub annotations: Vec<AnnotatedTaint>,
}

impl Model {
    pub fn join_user_models(&mut self, other: Model) {
        self.annotations.extend(other.annotations);
    }
}

#[derive(Clone, Debug, Default)]
pub struct ModelRegistryMap {
    entries: BTreeMap<Target, Model>,
}

impl ModelRegistryMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, target: Target, annotation: AnnotatedTaint) {
        self.entries.entry(target).or_default().annotations.push(annotation);
    }

    pub fn merge(&mut self, other: Self) {
        for (target, model) in other.entries {
            self.entries.entry(target).or_default().join_user_models(model);
        }
    }

    pub fn get(&self, target: &Target) -> Option<&Model> {
        self.entries.get(target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &Target> {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn target_of(modelable: &Modelable) -> Target {
    let name = modelable.fully_qualified_name().to_string();
    match modelable.kind() {
        ModelableKind::Function => Target::Function { name },
        ModelableKind::Method => Target::Method {
            class: modelable.class_name().ok().flatten().unwrap_or_default().to_string(),
            name,
        },
        ModelableKind::Attribute => Target::Attribute {
            class: modelable.class_name().ok().flatten().unwrap_or_default().to_string(),
            name,
        },
        ModelableKind::Global => Target::Global { name },
    }
}

fn all_targets_of_kind(host: &impl QueryHost, kind: ModelableKind) -> Vec<Modelable> {
    match kind {
        ModelableKind::Function => host.callables().into_iter().filter(|c| c.class_name.is_none()).map(Modelable::Function).collect(),
        ModelableKind::Method => host.callables().into_iter().filter(|c| c.class_name.is_some()).map(Modelable::Method).collect(),
        ModelableKind::Attribute => host.attributes().into_iter().map(Modelable::Attribute).collect(),
        ModelableKind::Global => host.globals().into_iter().map(Modelable::Global).collect(),
    }
}

/// The bundle of host-provided capabilities the executor needs: target
/// enumeration, type resolution, class hierarchy, and a scheduler for the
/// write-to-cache map-reduce pass.
pub trait QueryHost: CallableIterator + AttributeIterator + GlobalIterator {
    fn resolver(&self) -> &(dyn GlobalResolver + Sync);
    fn class_hierarchy(&self) -> &(dyn ClassHierarchyGraph + Sync);
    fn scheduler(&self) -> &dyn Scheduler;
}

fn write_to_cache_bin(queries: &[Query]) -> Vec<&Query> {
    queries.iter().filter(|q| q.writes_to_cache()).collect()
}

fn read_from_cache_bin(queries: &[Query]) -> Vec<&Query> {
    queries.iter().filter(|q| !q.writes_to_cache() && q.reads_from_cache()).collect()
}

fn regular_bin(queries: &[Query]) -> Vec<&Query> {
    queries.iter().filter(|q| !q.writes_to_cache() && !q.reads_from_cache()).collect()
}

fn run_write_phase(host: &impl QueryHost, queries: &[&Query]) -> Result<ReadWriteCache, ConfigError> {
    let mut cache = ReadWriteCache::new();

    for query in queries {
        if query.reads_from_cache() {
            return Err(ConfigError::WriteToCacheReferencesCache { query: query.name.clone() });
        }

        let resolver = host.resolver();
        let hierarchy = host.class_hierarchy();
        let targets = all_targets_of_kind(host, query.find);

        let shard_cache = host.scheduler().map_reduce(
            targets,
            ReadWriteCache::new(),
            |target| {
                let mut shard = ReadWriteCache::new();
                let mut captures = NameCaptures::new();
                let empty_cache = ReadWriteCache::new();
                if !matches(&query.where_, &target, resolver, hierarchy, &empty_cache, &mut captures) {
                    return shard;
                }
                let resolved_target = target_of(&target);
                for clause in &query.models {
                    if let ModelClause::WriteToCache { kind, name_template } = clause {
                        let class_name = target.class_name().ok().flatten();
                        let key = render_name_template(name_template, target.name(), class_name, captures.groups_for(target.fully_qualified_name()));
                        shard.insert(kind.clone(), key, resolved_target.clone());
                    }
                }
                shard
            },
            |mut acc, shard| {
                acc.merge(shard);
                acc
            },
        );
        cache.merge(shard_cache);
    }

    Ok(cache)
}

fn run_restricted_phase(
    host: &impl QueryHost,
    queries: &[&Query],
    cache: &ReadWriteCache,
    registry: &mut ModelRegistryMap,
    verification_errors: &mut Vec<VerificationError>,
) -> Result<(), ConfigError> {
    for query in queries {
        let candidates = CandidateTargetsFromCache::from_constraint(cache, &Constraint::AllOf(vec![query.where_.clone()]));
        let CandidateTargetsFromCache::Set(candidate_targets) = candidates else {
            return Err(ConfigError::ReadFromCacheEvaluatesToTop { query: query.name.clone() });
        };

        let resolver = host.resolver();
        let hierarchy = host.class_hierarchy();
        let mut produced: BTreeSet<String> = BTreeSet::new();

        for target in all_targets_of_kind(host, query.find) {
            let resolved_target = target_of(&target);
            if !candidate_targets.contains(&resolved_target) {
                continue;
            }
            let mut captures = NameCaptures::new();
            if !matches(&query.where_, &target, resolver, hierarchy, cache, &mut captures) {
                continue;
            }
            for annotation in project(&target, &query.models, resolver) {
                produced.insert(render_model(&resolved_target, &annotation));
                registry.record(resolved_target.clone(), annotation);
            }
        }

        verify(query, &produced, verification_errors);
    }

    Ok(())
}

fn run_regular_phase(host: &impl QueryHost, queries: &[&Query], registry: &mut ModelRegistryMap, verification_errors: &mut Vec<VerificationError>) {
    for query in queries {
        let resolver = host.resolver();
        let hierarchy = host.class_hierarchy();
        let empty_cache = ReadWriteCache::new();
        let mut produced: BTreeSet<String> = BTreeSet::new();

        for target in all_targets_of_kind(host, query.find) {
            let mut captures = NameCaptures::new();
            if !matches(&query.where_, &target, resolver, hierarchy, &empty_cache, &mut captures) {
                continue;
            }
            let resolved_target = target_of(&target);
            for annotation in project(&target, &query.models, resolver) {
                produced.insert(render_model(&resolved_target, &annotation));
                registry.record(resolved_target.clone(), annotation);
            }
        }

        verify(query, &produced, verification_errors);
    }
}

fn verify(query: &Query, produced: &BTreeSet<String>, errors: &mut Vec<VerificationError>) {
    for expected in &query.expected_models {
        if !produced.contains(expected) {
            errors.push(VerificationError::ExpectedModelMissing { query: query.name.clone(), model: expected.clone() });
        }
    }
    for unexpected in &query.unexpected_models {
        if produced.contains(unexpected) {
            errors.push(VerificationError::UnexpectedModelPresent { query: query.name.clone(), model: unexpected.clone() });
        }
    }
}

/// Runs every query through the three-phase pipeline (write-to-cache, then
/// read-from-cache restricted by what was written, then regular queries
/// unrestricted) and returns the accumulated model registry plus any
/// non-fatal verification failures. A `ConfigError` aborts immediately —
/// it means a query was assigned to the wrong bin or a read-from-cache
/// clause carries no actual cache-derived restriction.
pub fn generate_models_from_queries(host: &impl QueryHost, queries: &[Query]) -> Result<(ModelRegistryMap, Vec<VerificationError>), ConfigError> {
    let write_queries = write_to_cache_bin(queries);
    let read_queries = read_from_cache_bin(queries);
    let regular_queries = regular_bin(queries);

    let cache = run_write_phase(host, &write_queries)?;

    let mut registry = ModelRegistryMap::new();
    let mut errors = Vec::new();

    run_restricted_phase(host, &read_queries, &cache, &mut registry, &mut errors)?;
    run_regular_phase(host, &regular_queries, &mut registry, &mut errors);

    Ok((registry, errors))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::{Constraint, NameConstraint};
    use crate::query::{NameTemplatePart, Production};
    use taint_engine_core::domain::kind::Kind;
    use taint_engine_core::model::location::Location;
    use taint_engine_sdk::{CallableDescriptor, SequentialScheduler, StaticClassHierarchy, StaticResolver};

    struct FixedHost {
        callables: Vec<CallableDescriptor>,
        resolver: StaticResolver,
        hierarchy: StaticClassHierarchy,
        scheduler: SequentialScheduler,
    }

    impl CallableIterator for FixedHost {
        fn callables(&self) -> Vec<CallableDescriptor> {
            self.callables.clone()
        }
    }
    impl AttributeIterator for FixedHost {
        fn attributes(&self) -> Vec<taint_engine_sdk::AttributeDescriptor> {
            Vec::new()
        }
    }
    impl GlobalIterator for FixedHost {
        fn globals(&self) -> Vec<taint_engine_sdk::GlobalDescriptor> {
            Vec::new()
        }
    }
    impl QueryHost for FixedHost {
        fn resolver(&self) -> &(dyn GlobalResolver + Sync) {
            &self.resolver
        }
        fn class_hierarchy(&self) -> &(dyn ClassHierarchyGraph + Sync) {
            &self.hierarchy
        }
        fn scheduler(&self) -> &dyn Scheduler {
            &self.scheduler
        }
    }

    fn host_with(callables: Vec<CallableDescriptor>) -> FixedHost {
        FixedHost { callables, resolver: StaticResolver::new(), hierarchy: StaticClassHierarchy::new(), scheduler: SequentialScheduler }
    }

    fn location() -> Location {
        Location::new("a.py", 0, 1, 1, 1)
    }

    fn source_query() -> Query {
        Query {
            name: "tag-handlers".to_string(),
            find: ModelableKind::Function,
            where_: Constraint::FullyQualifiedName(NameConstraint::Equals("app.handler".to_string())),
            models: vec![ModelClause::Return(vec![Production::SourceTaint(Kind::new("UserControlled"))])],
            expected_models: Vec::new(),
            unexpected_models: Vec::new(),
            location: location(),
        }
    }

    #[test]
    fn a_regular_query_produces_a_registry_entry() {
        let host = host_with(vec![CallableDescriptor {
            name: "handler".to_string(),
            fully_qualified_name: "app.handler".to_string(),
            ..Default::default()
        }]);
        let (registry, errors) = generate_models_from_queries(&host, &[source_query()]).unwrap();
        assert!(errors.is_empty());
        assert!(!registry.is_empty());
    }

    #[test]
    fn a_write_to_cache_query_referencing_the_cache_is_a_config_error() {
        let host = host_with(Vec::new());
        let query = Query {
            name: "bad".to_string(),
            find: ModelableKind::Function,
            where_: Constraint::ReadFromCache { kind: "source".to_string(), name: "x".to_string() },
            models: vec![ModelClause::WriteToCache { kind: "source".to_string(), name_template: vec![NameTemplatePart::FunctionName] }],
            expected_models: Vec::new(),
            unexpected_models: Vec::new(),
            location: location(),
        };
        let result = generate_models_from_queries(&host, &[query]);
        assert_eq!(result, Err(ConfigError::WriteToCacheReferencesCache { query: "bad".to_string() }));
    }

    #[test]
    fn a_read_from_cache_query_with_no_matching_write_yields_an_empty_but_valid_set() {
        let host = host_with(vec![CallableDescriptor {
            name: "handler".to_string(),
            fully_qualified_name: "app.handler".to_string(),
            ..Default::default()
        }]);
        let query = Query {
            name: "reads".to_string(),
            find: ModelableKind::Function,
            where_: Constraint::ReadFromCache { kind: "source".to_string(), name: "tagged".to_string() },
            models: vec![ModelClause::Return(vec![Production::SourceTaint(Kind::new("UserControlled"))])],
            expected_models: Vec::new(),
            unexpected_models: Vec::new(),
            location: location(),
        };
        let (registry, errors) = generate_models_from_queries(&host, &[query]).unwrap();
        assert!(errors.is_empty());
        assert!(registry.is_empty());
    }

    #[test]
    fn an_unmet_expected_model_is_a_verification_error_not_a_config_error() {
        let host = host_with(vec![CallableDescriptor {
            name: "handler".to_string(),
            fully_qualified_name: "app.handler".to_string(),
            ..Default::default()
        }]);
        let mut query = source_query();
        query.expected_models = vec!["app.handler -> Sink[SqlInjection]".to_string()];
        let (_, errors) = generate_models_from_queries(&host, &[query]).unwrap();
        assert_eq!(errors.len(), 1);
    }
}
