use std::collections::{BTreeMap, BTreeSet};

use taint_engine_sdk::TaintConfigurationHost;

use crate::domain::kind::Kind;
use crate::issue::rule::Rule;

/// The rule configuration threaded through the flow engine as a plain
/// parameter — no process-wide mutable state. Implements
/// `TaintConfigurationHost` so the flow/query crates depend only on the
/// trait, not on this concrete shape.
#[derive(Clone, Debug, Default)]
pub struct TaintConfiguration {
    pub rules: Vec<Rule>,
    pub lineage_analysis: bool,
    triggered_sinks: BTreeMap<(Kind, Kind), Kind>,
    collapse_breadcrumbs: BTreeSet<String>,
}

impl TaintConfiguration {
    pub fn new(rules: Vec<Rule>, lineage_analysis: bool) -> Self {
        Self {
            rules,
            lineage_analysis,
            triggered_sinks: BTreeMap::new(),
            collapse_breadcrumbs: BTreeSet::new(),
        }
    }

    pub fn with_triggered_sink(mut self, partial_sink: Kind, source: Kind, complement: Kind) -> Self {
        self.triggered_sinks.insert((partial_sink, source), complement);
        self
    }

    /// Adds a breadcrumb to the set collapsed source/sink subtrees are
    /// widened with during flow matching.
    pub fn with_collapse_breadcrumb(mut self, breadcrumb: impl Into<String>) -> Self {
        self.collapse_breadcrumbs.insert(breadcrumb.into());
        self
    }

    pub fn rule_by_code(&self, code: i64) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.code == code)
    }
}

impl TaintConfigurationHost for TaintConfiguration {
    type Kind = Kind;
    type Rule = Rule;

    fn rules(&self) -> &[Self::Rule] {
        &self.rules
    }

    fn lineage_analysis(&self) -> bool {
        self.lineage_analysis
    }

    fn get_triggered_sink(&self, partial_sink: &Self::Kind, source: &Self::Kind) -> Option<Self::Kind> {
        self.triggered_sinks
            .get(&(partial_sink.clone(), source.clone()))
            .cloned()
    }

    fn collapse_breadcrumbs(&self) -> &BTreeSet<String> {
        &self.collapse_breadcrumbs
    }
}

#[cfg(test)]
mod tests {
    use super::TaintConfiguration;
    use crate::domain::kind::Kind;
    use taint_engine_sdk::TaintConfigurationHost;

    #[test]
    fn get_triggered_sink_returns_registered_complement() {
        let configuration = TaintConfiguration::new(Vec::new(), false).with_triggered_sink(
            Kind::new("SqlQueryPart"),
            Kind::new("SqlParamsPart"),
            Kind::new("SqlInjection"),
        );
        assert_eq!(
            configuration.get_triggered_sink(&Kind::new("SqlQueryPart"), &Kind::new("SqlParamsPart")),
            Some(Kind::new("SqlInjection"))
        );
        assert_eq!(
            configuration.get_triggered_sink(&Kind::new("SqlQueryPart"), &Kind::new("Other")),
            None
        );
    }

    #[test]
    fn rule_by_code_finds_matching_rule_only() {
        let configuration = TaintConfiguration::new(Vec::new(), false);
        assert!(configuration.rule_by_code(1).is_none());
    }

    #[test]
    fn collapse_breadcrumbs_defaults_empty_and_accumulates_via_builder() {
        let configuration = TaintConfiguration::new(Vec::new(), false);
        assert!(configuration.collapse_breadcrumbs().is_empty());

        let configuration = configuration.with_collapse_breadcrumb("tito");
        assert!(configuration.collapse_breadcrumbs().contains("tito"));
    }
}
