use taint_engine_core::domain::kind::Kind;
use taint_engine_sdk::{GlobalResolver, Modelable};

use crate::constraint::Constraint;
use crate::matcher::{matches, NameCaptures};
use crate::query::{parse_parametric_subkind, ModelClause, Production};

/// Where a projected annotation attaches on a modelable.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum AnnotationTarget {
    Return,
    NamedParameter(String),
    PositionalParameter(u32),
    Attribute,
    Global,
}

#[derive(Clone, Debug)]
pub enum AnnotatedTaint {
    Source { target: AnnotationTarget, kind: Kind },
    Sink { target: AnnotationTarget, kind: Kind },
    ViaTypeOf { target: AnnotationTarget, parameter: String },
    ViaValueOf { target: AnnotationTarget, parameter: String },
}

fn project_production(production: &Production, target: &AnnotationTarget, annotation: Option<&str>) -> Option<AnnotatedTaint> {
    match production {
        Production::SourceTaint(kind) => Some(AnnotatedTaint::Source { target: target.clone(), kind: kind.clone() }),
        Production::SinkTaint(kind) => Some(AnnotatedTaint::Sink { target: target.clone(), kind: kind.clone() }),
        Production::ParametricSource { pattern, kind } => {
            let subkind = parse_parametric_subkind(annotation?, pattern)?;
            Some(AnnotatedTaint::Source { target: target.clone(), kind: kind.clone().with_subkind(subkind) })
        }
        Production::ParametricSink { pattern, kind } => {
            let subkind = parse_parametric_subkind(annotation?, pattern)?;
            Some(AnnotatedTaint::Sink { target: target.clone(), kind: kind.clone().with_subkind(subkind) })
        }
        Production::ViaTypeOf { parameter } => Some(AnnotatedTaint::ViaTypeOf { target: target.clone(), parameter: parameter.clone() }),
        Production::ViaValueOf { parameter } => Some(AnnotatedTaint::ViaValueOf { target: target.clone(), parameter: parameter.clone() }),
    }
}

/// Applies every model clause of a query to `target`, producing the
/// annotations that attach directly to taint kinds (`AnnotatedTaint`
/// entries). `WriteToCache` clauses are not projected here — the executor
/// consumes them separately, once per target, to populate the cache.
pub fn project(target: &Modelable, clauses: &[ModelClause], resolver: &dyn GlobalResolver) -> Vec<AnnotatedTaint> {
    let mut out = Vec::new();

    for clause in clauses {
        match clause {
            ModelClause::Return(productions) => {
                let annotation = target.return_annotation().ok().flatten();
                for production in productions {
                    if let Some(annotated) = project_production(production, &AnnotationTarget::Return, annotation) {
                        out.push(annotated);
                    }
                }
            }
            ModelClause::NamedParameter { name, productions } => {
                if let Ok(parameters) = target.parameters() {
                    if let Some(parameter) = parameters.iter().find(|p| &p.name == name) {
                        let target_kind = AnnotationTarget::NamedParameter(parameter.name.clone());
                        for production in productions {
                            let production = production.rewrite_global_sentinel(&parameter.name);
                            if let Some(annotated) = project_production(&production, &target_kind, parameter.annotation.as_deref()) {
                                out.push(annotated);
                            }
                        }
                    }
                }
            }
            ModelClause::PositionalParameter { index, productions } => {
                if let Ok(parameters) = target.parameters() {
                    if let Some(parameter) = parameters.iter().find(|p| p.position == *index) {
                        let target_kind = AnnotationTarget::PositionalParameter(*index);
                        for production in productions {
                            let production = production.rewrite_global_sentinel(&parameter.name);
                            if let Some(annotated) = project_production(&production, &target_kind, parameter.annotation.as_deref()) {
                                out.push(annotated);
                            }
                        }
                    }
                }
            }
            ModelClause::AllParameters { excludes, productions } => {
                if let Ok(parameters) = target.parameters() {
                    for parameter in parameters.iter().filter(|p| !excludes.contains(&p.name)) {
                        let target_kind = AnnotationTarget::NamedParameter(parameter.name.clone());
                        for production in productions {
                            let production = production.rewrite_global_sentinel(&parameter.name);
                            if let Some(annotated) = project_production(&production, &target_kind, parameter.annotation.as_deref()) {
                                out.push(annotated);
                            }
                        }
                    }
                }
            }
            ModelClause::Parameter { where_, productions } => {
                if let Ok(parameters) = target.parameters() {
                    for parameter in parameters {
                        if parameter_constraint_matches(where_, parameter, resolver) {
                            let target_kind = AnnotationTarget::NamedParameter(parameter.name.clone());
                            for production in productions {
                                let production = production.rewrite_global_sentinel(&parameter.name);
                                if let Some(annotated) = project_production(&production, &target_kind, parameter.annotation.as_deref()) {
                                    out.push(annotated);
                                }
                            }
                        }
                    }
                }
            }
            ModelClause::Attribute(productions) => {
                let annotation = target.type_annotation().ok().flatten();
                for production in productions {
                    if let Some(annotated) = project_production(production, &AnnotationTarget::Attribute, annotation) {
                        out.push(annotated);
                    }
                }
            }
            ModelClause::Global(productions) => {
                let annotation = target.type_annotation().ok().flatten();
                for production in productions {
                    if let Some(annotated) = project_production(production, &AnnotationTarget::Global, annotation) {
                        out.push(annotated);
                    }
                }
            }
            ModelClause::WriteToCache { .. } => {}
        }
    }

    out
}

/// A `Parameter` clause's `where_` is evaluated against the parameter's
/// name/annotation as a stand-in `Modelable::Function` with a single
/// parameter — reusing the same constraint evaluator rather than a
/// parallel implementation restricted to `Name`/`Annotation`.
fn parameter_constraint_matches(constraint: &Constraint, parameter: &taint_engine_sdk::ParameterDescriptor, resolver: &dyn GlobalResolver) -> bool {
    use taint_engine_sdk::{CallableDescriptor, StaticClassHierarchy};

    let stand_in = Modelable::Function(CallableDescriptor {
        name: parameter.name.clone(),
        fully_qualified_name: parameter.name.clone(),
        return_annotation: parameter.annotation.clone(),
        ..Default::default()
    });
    let hierarchy = StaticClassHierarchy::new();
    let mut captures = NameCaptures::new();
    let cache = crate::cache::ReadWriteCache::new();
    matches(constraint, &stand_in, resolver, &hierarchy, &cache, &mut captures)
}

#[cfg(test)]
mod tests {
    use super::{project, AnnotatedTaint, AnnotationTarget};
    use crate::query::{ModelClause, Production};
    use taint_engine_core::domain::kind::Kind;
    use taint_engine_sdk::{CallableDescriptor, Modelable, ParameterDescriptor, StaticResolver};

    fn handler() -> Modelable {
        Modelable::Function(CallableDescriptor {
            name: "handler".to_string(),
            fully_qualified_name: "app.handler".to_string(),
            return_annotation: Some("str".to_string()),
            parameters: vec![ParameterDescriptor {
                name: "request".to_string(),
                position: 0,
                annotation: Some("Annotated[Request, TaintSource(header)]".to_string()),
            }],
            ..Default::default()
        })
    }

    #[test]
    fn return_clause_with_source_taint_projects_once() {
        let resolver = StaticResolver::new();
        let clauses = vec![ModelClause::Return(vec![Production::SourceTaint(Kind::new("UserControlled"))])];
        let projected = project(&handler(), &clauses, &resolver);
        assert_eq!(projected.len(), 1);
        assert!(matches!(projected[0], AnnotatedTaint::Source { target: AnnotationTarget::Return, .. }));
    }

    #[test]
    fn named_parameter_clause_with_parametric_source_extracts_subkind() {
        let resolver = StaticResolver::new();
        let clauses = vec![ModelClause::NamedParameter {
            name: "request".to_string(),
            productions: vec![Production::ParametricSource { pattern: "TaintSource".to_string(), kind: Kind::new("UserControlled") }],
        }];
        let projected = project(&handler(), &clauses, &resolver);
        assert_eq!(projected.len(), 1);
        match &projected[0] {
            AnnotatedTaint::Source { kind, .. } => assert_eq!(kind.subkind.as_deref(), Some("header")),
            other => panic!("expected a source annotation, got {other:?}"),
        }
    }

    #[test]
    fn all_parameters_clause_excludes_named_parameters() {
        let resolver = StaticResolver::new();
        let clauses = vec![ModelClause::AllParameters {
            excludes: vec!["request".to_string()],
            productions: vec![Production::SinkTaint(Kind::new("SqlInjection"))],
        }];
        let projected = project(&handler(), &clauses, &resolver);
        assert!(projected.is_empty());
    }

    #[test]
    fn a_parameter_clause_via_type_of_rewrites_the_global_sentinel() {
        let resolver = StaticResolver::new();
        let clauses = vec![ModelClause::AllParameters {
            excludes: Vec::new(),
            productions: vec![Production::ViaTypeOf { parameter: "$global".to_string() }],
        }];
        let projected = project(&handler(), &clauses, &resolver);
        assert_eq!(projected.len(), 1);
        match &projected[0] {
            AnnotatedTaint::ViaTypeOf { parameter, .. } => assert_eq!(parameter, "request"),
            other => panic!("expected a via-type-of annotation, got {other:?}"),
        }
    }
}
