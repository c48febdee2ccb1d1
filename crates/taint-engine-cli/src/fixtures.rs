//! A small, bundled demo analysis unit and query set. The engine has no
//! source parser of its own (`taint-engine-sdk`'s traits are implemented by
//! the host); this module stands in for that host so `check` and `query`
//! have something concrete to run over without a real project on disk.

use taint_engine_core::domain::frame::{CallInfo, Frame};
use taint_engine_core::domain::kind::Kind;
use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint};
use taint_engine_core::issue::{Candidate, Flow, Rule, TaintConfiguration};
use taint_engine_core::model::location::Location;
use taint_engine_core::model::sink_handle::SinkHandle;
use taint_engine_core::model::target::Target;
use taint_engine_sdk::{
    AttributeDescriptor, AttributeIterator, CallableDescriptor, CallableIterator,
    ClassHierarchyGraph, GlobalDescriptor, GlobalIterator, GlobalResolver, ParameterDescriptor,
    Scheduler, SequentialScheduler, StaticClassHierarchy, StaticResolver, TaintSide,
};
use taint_engine_flow::CandidatesTable;
use taint_engine_query::{Constraint, ModelClause, NameConstraint, Production, Query};

fn frame(file: &str) -> Frame {
    Frame::leaf(CallInfo::Origin {
        location: Location::new(file, 12, 48, 4, 9),
    })
}

/// One candidate: a request handler whose `request.header` (tagged
/// `UserControlled`) reaches a `db.execute` call (tagged `SqlInjection`).
pub fn demo_candidates() -> CandidatesTable {
    let mut candidates = CandidatesTable::new();
    let mut candidate = Candidate::new(
        Location::new("app/handlers.py", 12, 48, 4, 9),
        SinkHandle::Global { kind: "db.execute".to_string() },
    );
    candidate.flows.push(Flow::new(
        ForwardTaint::singleton(Kind::new("UserControlled").with_subkind("header"), frame("app/handlers.py")),
        BackwardTaint::singleton(Kind::new("SqlInjection"), frame("app/handlers.py")),
    ));
    candidates.insert(candidate);
    candidates
}

pub fn demo_define() -> Target {
    Target::Function { name: "app.handlers.handler".to_string() }
}

pub fn demo_configuration() -> TaintConfiguration {
    let rule = Rule {
        code: 1001,
        sources: vec![Kind::new("UserControlled")],
        sinks: vec![Kind::new("SqlInjection")],
        transforms: Vec::new(),
        name: "sql-injection".to_string(),
        message_format: "data tainted via {$sources} reaches {$sinks}".to_string(),
        expected_models: Vec::new(),
        unexpected_models: Vec::new(),
    };
    TaintConfiguration::new(vec![rule], false)
}

#[cfg(feature = "parallel")]
type DemoScheduler = crate::scheduler::RayonScheduler;
#[cfg(not(feature = "parallel"))]
type DemoScheduler = SequentialScheduler;

/// A single callable (`handler`, with one parameter annotated with a
/// parametric source marker) the bundled queries run against. The
/// write-to-cache map-reduce pass runs on `RayonScheduler` when built with
/// the `parallel` feature, `SequentialScheduler` otherwise.
pub struct DemoHost {
    callables: Vec<CallableDescriptor>,
    resolver: StaticResolver,
    hierarchy: StaticClassHierarchy,
    scheduler: DemoScheduler,
}

impl DemoHost {
    pub fn new() -> Self {
        Self {
            callables: vec![CallableDescriptor {
                name: "handler".to_string(),
                fully_qualified_name: "app.handlers.handler".to_string(),
                class_name: None,
                return_annotation: Some("str".to_string()),
                parameters: vec![ParameterDescriptor {
                    name: "request".to_string(),
                    position: 0,
                    annotation: Some("Annotated[Request, TaintSource(header)]".to_string()),
                }],
                decorators: Vec::new(),
            }],
            resolver: StaticResolver::new(),
            hierarchy: StaticClassHierarchy::new(),
            scheduler: DemoScheduler::default(),
        }
    }
}

impl CallableIterator for DemoHost {
    fn callables(&self) -> Vec<CallableDescriptor> {
        self.callables.clone()
    }
}

impl AttributeIterator for DemoHost {
    fn attributes(&self) -> Vec<AttributeDescriptor> {
        Vec::new()
    }
}

impl GlobalIterator for DemoHost {
    fn globals(&self) -> Vec<GlobalDescriptor> {
        Vec::new()
    }
}

impl taint_engine_query::QueryHost for DemoHost {
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

/// One query: every function whose parameter carries a `TaintSource(...)`
/// annotation becomes a parametric source on that parameter.
pub fn demo_queries() -> Vec<Query> {
    vec![Query {
        name: "parametric-sources-from-annotation".to_string(),
        find: taint_engine_sdk::ModelableKind::Function,
        where_: Constraint::AnyParameter(NameConstraint::Matches("TaintSource\\(.+\\)".to_string())),
        models: vec![ModelClause::AllParameters {
            excludes: Vec::new(),
            productions: vec![Production::ParametricSource {
                pattern: "TaintSource".to_string(),
                kind: Kind::new("UserControlled"),
            }],
        }],
        expected_models: Vec::new(),
        unexpected_models: Vec::new(),
        location: Location::new("app/handlers.py", 0, 1, 1, 1),
    }]
}
