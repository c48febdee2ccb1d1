#![forbid(unsafe_code)]

//! The taint domain's reference implementation, issue/rule/configuration
//! types, configuration loading, and stable JSON reporting. Everything
//! here is pure data plus the `taint_engine_sdk` trait implementations the
//! flow and query crates are generic over.

pub mod config;
pub mod domain;
pub mod issue;
pub mod model;
pub mod report;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn crate_name() -> &'static str {
    "taint-engine-core"
}
