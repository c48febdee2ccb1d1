pub mod candidate;
pub mod configuration;
pub mod flow;
pub mod issue;
pub mod rule;

pub use candidate::Candidate;
pub use configuration::TaintConfiguration;
pub use flow::Flow;
pub use issue::Issue;
pub use rule::{Rule, Transform};
