#![forbid(unsafe_code)]

//! The flow/rule pipeline: matches a source tree against a sink tree at a
//! call site, mutually refines the two sides through the sanitizer
//! fixpoint, splits a rule's required transform sequence across source and
//! sink, tracks multi-source partial-sink protocols, and applies the rule
//! set over a definition's accumulated candidates to produce issues.

pub mod candidates;
pub mod engine;
pub mod matcher;
pub mod sanitizer;
pub mod splitter;
pub mod triggered;

pub use candidates::CandidatesTable;
pub use engine::{generate_issues, validate_rule_codes, RuleEngineError};
pub use matcher::{check_flow, match_flows};
pub use triggered::{check_triggered_flows, flush_into_location_map, TriggerState, TriggeredSinkHashMap, TriggeredSinkLocationMap};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
