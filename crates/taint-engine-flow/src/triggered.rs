use std::collections::BTreeMap;

use taint_engine_core::domain::frame::{CallInfo, ExtraTraceFrame, Frame, LeafKindRef};
use taint_engine_core::domain::kind::Kind;
use taint_engine_core::domain::tree::{BackwardTaint, ForwardTaint, Tree};
use taint_engine_core::issue::{Candidate, Flow};
use taint_engine_core::model::location::Location;
use taint_engine_core::model::sink_handle::SinkHandle;
use taint_engine_sdk::{TaintConfigurationHost, TaintSide, TaintTree};

use crate::candidates::CandidatesTable;
use crate::matcher::match_flows;

/// A kind is a partial sink iff its name is `PartialSink` and its subkind
/// carries the sink's textual key (e.g. `sql_query`, `sql_params`).
fn partial_sink_key(kind: &Kind) -> Option<&str> {
    if kind.name == "PartialSink" {
        kind.subkind.as_deref()
    } else {
        None
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TriggerState {
    Declared,
    HalfTriggered,
    FullyTriggered,
}

#[derive(Clone, Debug)]
struct TriggeredSinkEntry {
    state: TriggerState,
    backward: BackwardTaint,
}

impl Default for TriggeredSinkEntry {
    fn default() -> Self {
        Self {
            state: TriggerState::Declared,
            backward: BackwardTaint::bottom(),
        }
    }
}

/// Per-call map from a triggered sink's `show` key to its accumulated
/// backward state. Exclusively owned by the analysis of one call site;
/// consumed when the call returns.
#[derive(Clone, Debug, Default)]
pub struct TriggeredSinkHashMap {
    entries: BTreeMap<String, TriggeredSinkEntry>,
}

impl TriggeredSinkHashMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state_of(&self, key: &str) -> Option<&TriggerState> {
        self.entries.get(key).map(|entry| &entry.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Per-definition mapping from call location to the triggered-sink backward
/// state propagated from that call; joined into the definition's own
/// backward result so callers observe the triggered kind.
#[derive(Clone, Debug, Default)]
pub struct TriggeredSinkLocationMap {
    entries: BTreeMap<Location, BackwardTaint>,
}

impl TriggeredSinkLocationMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: Location, side: BackwardTaint) {
        self.entries
            .entry(location)
            .and_modify(|existing| *existing = existing.join(&side))
            .or_insert(side);
    }

    pub fn collapse(&self) -> BackwardTaint {
        self.entries
            .values()
            .fold(BackwardTaint::bottom(), |acc, side| acc.join(side))
    }
}

/// Scans `sink_tree` for partial sinks, consults the rule configuration for
/// each (partial_sink, source_kind) pair present, and — when a complement is
/// known — matches a synthetic sink leaf against `source_tree`. The first
/// half to arrive is recorded as half-triggered and provisional; the second
/// half promotes the entry to fully-triggered and appends a candidate.
/// Returns the flows newly promoted to fully-triggered this call.
pub fn check_triggered_flows<C>(
    candidates: &mut CandidatesTable,
    triggered: &mut TriggeredSinkHashMap,
    configuration: &C,
    location: &Location,
    sink_handle: &SinkHandle,
    source_tree: &Tree<ForwardTaint>,
    sink_tree: &Tree<BackwardTaint>,
) -> Vec<Flow>
where
    C: TaintConfigurationHost<Kind = Kind>,
{
    let mut promoted = Vec::new();
    let breadcrumbs = configuration.collapse_breadcrumbs();
    let collapsed_source = source_tree.collapse(breadcrumbs);
    let partial_sinks: Vec<Kind> = sink_tree
        .collapse(breadcrumbs)
        .kinds()
        .into_iter()
        .filter(|kind| partial_sink_key(kind).is_some())
        .collect();

    for partial_sink in &partial_sinks {
        for source_kind in collapsed_source.kinds() {
            let Some(complement) = configuration.get_triggered_sink(partial_sink, &source_kind) else {
                continue;
            };

            let synthetic_frame = Frame {
                extra_traces: vec![ExtraTraceFrame {
                    call_info: CallInfo::Origin {
                        location: location.clone(),
                    },
                    leaf_kind: LeafKindRef::Source(source_kind.clone()),
                    message: None,
                }],
                ..Frame::leaf(CallInfo::Origin {
                    location: location.clone(),
                })
            };
            let synthetic_side = BackwardTaint::singleton(complement.clone(), synthetic_frame);
            let synthetic_tree = Tree::<BackwardTaint>::create_leaf(synthetic_side.clone());

            let flows = match_flows(source_tree, &synthetic_tree, breadcrumbs);
            if flows.is_empty() {
                continue;
            }

            let key = complement.name.clone();
            let entry = triggered.entries.entry(key).or_default();
            let complement_already_present = !entry.backward.is_bottom();
            entry.backward = entry.backward.join(&synthetic_side);

            if complement_already_present {
                entry.state = TriggerState::FullyTriggered;
                let mut candidate = Candidate::new(location.clone(), sink_handle.clone());
                candidate.flows = flows.clone();
                candidates.insert(candidate);
                promoted.extend(flows);
            } else {
                entry.state = TriggerState::HalfTriggered;
            }
        }
    }

    promoted
}

/// Transfers a call's triggered-sink map into the definition-level location
/// map, keyed by the call's location. Discards nothing here — provisional,
/// never-promoted entries are pruned by the host after the global fixpoint.
pub fn flush_into_location_map(
    triggered: TriggeredSinkHashMap,
    location: Location,
    location_map: &mut TriggeredSinkLocationMap,
) {
    let joined = triggered
        .entries
        .into_values()
        .fold(BackwardTaint::bottom(), |acc, entry| acc.join(&entry.backward));
    if !joined.is_bottom() {
        location_map.insert(location, joined);
    }
}
