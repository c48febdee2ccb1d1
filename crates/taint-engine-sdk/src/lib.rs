#![forbid(unsafe_code)]

//! Traits the host (source parser, type resolver, build-system bridge)
//! implements and the rest of the workspace consumes: the taint domain
//! facade, the scheduler, the class hierarchy, the global resolver, and
//! modelable target descriptions. This crate has no dependency on
//! `taint-engine-core` — the domain's concrete types depend on these
//! traits, not the other way around.

mod class_hierarchy;
mod modelable;
mod resolver;
mod scheduler;
mod taint_configuration;
mod taint_side;

pub use class_hierarchy::{ClassHierarchyGraph, StaticClassHierarchy};
pub use modelable::{
    AttributeDescriptor, AttributeIterator, CallableDescriptor, CallableIterator,
    DecoratorDescriptor, GlobalDescriptor, GlobalIterator, Modelable, ModelableError,
    ModelableKind, ParameterDescriptor,
};
pub use resolver::{ClassSummary, GlobalResolver, StaticResolver};
pub use scheduler::{Scheduler, SequentialScheduler};
pub use taint_configuration::TaintConfigurationHost;
pub use taint_side::{BackwardTaint, ForwardTaint, TaintSide, TaintTree};
