use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::handle::IssueHandle;
use crate::domain::kind::Kind;
use crate::model::location::Location;
use crate::model::target::Target;

/// Where a frame's taint entered the flow from the call graph's point of
/// view. `Origin` is used for the synthetic leaf the triggered-sink
/// tracker builds when a partial sink's complement arrives.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum CallInfo {
    Origin { location: Location },
    CallSite { location: Location, callee: Target },
}

impl CallInfo {
    pub fn location(&self) -> &Location {
        match self {
            Self::Origin { location } | Self::CallSite { location, .. } => location,
        }
    }
}

/// Tags which side of a flow an extra trace's kind was recorded from.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum LeafKindRef {
    Source(Kind),
    Sink(Kind),
}

/// One extra hop recorded alongside a frame's main trace, e.g. the
/// `ExtraTraceFirstHop` the triggered-sink tracker attaches when a partial
/// sink is half-triggered.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct ExtraTraceFrame {
    pub call_info: CallInfo,
    pub leaf_kind: LeafKindRef,
    pub message: Option<String>,
}

/// The leaf payload of a taint tree path. Meet and join are pointwise:
/// features and issue handles union, breadcrumbs and extra traces
/// concatenate and dedup, trace length takes the shorter (more direct)
/// trace, and call info keeps the left side's — joining two frames never
/// claims a flow originated at two different call sites at once.
/// `first_field`/`first_index` record the first field-typed/index-typed
/// access step encountered on the path this frame was attached at,
/// whichever of the two sides wrote a value first is kept on join.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub features: BTreeSet<String>,
    pub breadcrumbs: Vec<String>,
    pub call_info: Option<CallInfo>,
    pub trace_length: u32,
    pub extra_traces: Vec<ExtraTraceFrame>,
    pub issue_handles: BTreeSet<IssueHandle>,
    pub first_field: Option<String>,
    pub first_index: Option<String>,
}

impl Frame {
    pub fn leaf(call_info: CallInfo) -> Self {
        Self {
            call_info: Some(call_info),
            ..Self::default()
        }
    }

    pub fn join(&self, other: &Self) -> Self {
        let mut breadcrumbs = self.breadcrumbs.clone();
        for crumb in &other.breadcrumbs {
            if !breadcrumbs.contains(crumb) {
                breadcrumbs.push(crumb.clone());
            }
        }

        let mut extra_traces = self.extra_traces.clone();
        for trace in &other.extra_traces {
            if !extra_traces.contains(trace) {
                extra_traces.push(trace.clone());
            }
        }

        Self {
            features: self.features.union(&other.features).cloned().collect(),
            breadcrumbs,
            call_info: self.call_info.clone().or_else(|| other.call_info.clone()),
            trace_length: self.trace_length.min(other.trace_length),
            extra_traces,
            issue_handles: self
                .issue_handles
                .union(&other.issue_handles)
                .cloned()
                .collect(),
            first_field: self.first_field.clone().or_else(|| other.first_field.clone()),
            first_index: self.first_index.clone().or_else(|| other.first_index.clone()),
        }
    }
}
