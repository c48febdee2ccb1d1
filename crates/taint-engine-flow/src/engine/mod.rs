use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use taint_engine_core::domain::handle::IssueHandle;
use taint_engine_core::domain::kind::Kind;
use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint};
use taint_engine_core::issue::{Issue, TaintConfiguration};
use taint_engine_core::model::target::Target;
use taint_engine_sdk::TaintSide;

use crate::candidates::CandidatesTable;
use crate::splitter;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RuleEngineError {
    UnknownRuleCode { code: i64 },
}

impl Display for RuleEngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRuleCode { code } => {
                write!(f, "rule code {code} references no configured rule")
            }
        }
    }
}

impl Error for RuleEngineError {}

/// Groups a side's (kind, taint) entries by their base kind — subkind and
/// transform labels discarded — joining entries that collapse onto the
/// same base. This is the lookup key a rule's source/sink list is matched
/// against, not the literal kind a flow was recorded under.
fn partition_by_base<S: TaintSide<Kind = Kind>>(side: &S) -> BTreeMap<Kind, S> {
    let mut result: BTreeMap<Kind, S> = BTreeMap::new();
    for (kind, part) in side.partition() {
        let base = kind.discard_subkind().discard_transforms();
        result
            .entry(base)
            .and_modify(|existing| *existing = existing.join(&part))
            .or_insert(part);
    }
    result
}

fn aggregate<S: TaintSide<Kind = Kind>>(partition: &BTreeMap<Kind, S>, rule_kinds: &[Kind]) -> S {
    rule_kinds
        .iter()
        .map(|kind| kind.discard_subkind().discard_transforms())
        .filter_map(|base| partition.get(&base))
        .fold(S::bottom(), |acc, part| acc.join(part))
}

/// Applies every configured rule to every flow in `candidates`, producing
/// one issue per (candidate, flow, rule) with a non-bottom result after
/// transform splitting. In merge-access-path mode (the default) issues
/// sharing a handle are joined into one; in lineage-analysis mode every
/// partition keeps its own issue.
pub fn generate_issues(candidates: &CandidatesTable, configuration: &TaintConfiguration, define: &Target) -> Vec<Issue> {
    let mut merged: BTreeMap<IssueHandle, Issue> = BTreeMap::new();
    let mut lineage: Vec<Issue> = Vec::new();

    for candidate in candidates.candidates() {
        for flow in &candidate.flows {
            let source_partition = partition_by_base::<ForwardTaint>(&flow.source);
            let sink_partition = partition_by_base::<BackwardTaint>(&flow.sink);

            for rule in &configuration.rules {
                let source_taint = aggregate(&source_partition, &rule.sources);
                let sink_taint = aggregate(&sink_partition, &rule.sinks);
                if source_taint.is_bottom() || sink_taint.is_bottom() {
                    continue;
                }

                let result = splitter::split_and_join(&rule.transforms, &source_taint, &sink_taint);
                if result.is_bottom() {
                    continue;
                }

                let handle = IssueHandle::new(rule.code, define.clone(), candidate.sink_handle.clone());
                let issue = Issue::new(result, handle.clone(), candidate.location.clone(), define.clone());

                if configuration.lineage_analysis {
                    lineage.push(issue);
                } else {
                    match merged.entry(handle) {
                        Entry::Occupied(mut existing) => existing.get_mut().join(issue),
                        Entry::Vacant(vacant) => {
                            vacant.insert(issue);
                        }
                    }
                }
            }
        }
    }

    if configuration.lineage_analysis {
        lineage
    } else {
        merged.into_values().collect()
    }
}

/// Validates that every rule code an issue's handle references still has a
/// matching rule in `configuration` — a rule code with no match is a fatal
/// configuration inconsistency rather than something to skip silently.
pub fn validate_rule_codes(issues: &[Issue], configuration: &TaintConfiguration) -> Result<(), RuleEngineError> {
    for issue in issues {
        if configuration.rule_by_code(issue.handle.code).is_none() {
            return Err(RuleEngineError::UnknownRuleCode { code: issue.handle.code });
        }
    }
    Ok(())
}
