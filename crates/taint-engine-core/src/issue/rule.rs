use serde::{Deserialize, Serialize};

use crate::domain::kind::Kind;

/// A named transform label, as it appears in `rule.transforms` and in a
/// kind's `named_transforms`.
pub type Transform = String;

/// A user-defined rule: which source kinds paired with which sink kinds,
/// through which required transform sequence, produce an issue.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub code: i64,
    pub sources: Vec<Kind>,
    pub sinks: Vec<Kind>,
    pub transforms: Vec<Transform>,
    pub name: String,
    pub message_format: String,
    pub expected_models: Vec<String>,
    pub unexpected_models: Vec<String>,
}

impl Rule {
    /// Substitutes `{$sources}`, `{$sinks}`, `{$transforms}` with
    /// comma-joined, sorted, deduplicated kind/transform names.
    pub fn render_message(&self) -> String {
        let mut sources: Vec<&str> = self.sources.iter().map(|k| k.name.as_str()).collect();
        sources.sort_unstable();
        sources.dedup();

        let mut sinks: Vec<&str> = self.sinks.iter().map(|k| k.name.as_str()).collect();
        sinks.sort_unstable();
        sinks.dedup();

        let mut transforms: Vec<&str> = self.transforms.iter().map(String::as_str).collect();
        transforms.sort_unstable();
        transforms.dedup();

        self.message_format
            .replace("{$sources}", &sources.join(", "))
            .replace("{$sinks}", &sinks.join(", "))
            .replace("{$transforms}", &transforms.join(", "))
    }
}
