#![forbid(unsafe_code)]

//! Query constraint matching, models-clause projection, and the
//! read/write cache pipeline that turns a set of queries into a registry
//! of source/sink annotations over the host's callables, attributes, and
//! globals.

pub mod cache;
pub mod constraint;
pub mod executor;
pub mod matcher;
pub mod projector;
pub mod query;

pub use cache::{CandidateTargetsFromCache, ReadWriteCache};
pub use constraint::{ArgumentsConstraint, ClassConstraint, Constraint, DecoratorArguments, NameConstraint};
pub use executor::{generate_models_from_queries, ConfigError, Model, ModelRegistryMap, QueryHost, VerificationError};
pub use matcher::NameCaptures;
pub use projector::{AnnotatedTaint, AnnotationTarget};
pub use query::{ModelClause, NameTemplatePart, Production, Query};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
