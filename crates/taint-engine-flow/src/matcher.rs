use std::collections::BTreeSet;

use taint_engine_core::domain::tree::{AccessStep, BackwardTaint, ForwardTaint, Tree};
use taint_engine_core::issue::{Candidate, Flow};
use taint_engine_core::model::{Location, SinkHandle};
use taint_engine_sdk::{TaintSide, TaintTree};

use crate::candidates::CandidatesTable;

/// Enumerates one flow per sink-taint path with a non-empty matching
/// source. The source tree is upward-closed (`read` joins every ancestor),
/// the sink tree enumerates downward paths — folding along sink paths
/// avoids the quadratic cross product and still yields the minimal
/// deduplicated flow set. `breadcrumbs` is the configured set every
/// collapsed subtree is widened with.
pub fn match_flows(
    source_tree: &Tree<ForwardTaint>,
    sink_tree: &Tree<BackwardTaint>,
    breadcrumbs: &BTreeSet<String>,
) -> Vec<Flow> {
    if source_tree.is_empty() {
        return Vec::new();
    }

    sink_tree.fold_leaf_paths(Vec::new(), |mut flows, path, sink_taint| {
        let source_taint = collapse_at(source_tree, path, breadcrumbs);
        if !source_taint.is_bottom() {
            flows.push(Flow::new(source_taint, sink_taint.clone()));
        }
        flows
    })
}

fn collapse_at(source_tree: &Tree<ForwardTaint>, path: &[AccessStep], breadcrumbs: &BTreeSet<String>) -> ForwardTaint {
    // `read` already joins ancestor content; the subtree rooted at `path`
    // still needs collapsing since deeper fields may carry taint too.
    let subtree_result = source_tree
        .subtree_at(path)
        .map(|subtree| subtree.collapse(breadcrumbs))
        .unwrap_or_else(ForwardTaint::bottom);
    source_tree.read(path).join(&subtree_result)
}

/// Appends a candidate built from matching `source_tree` against
/// `sink_tree` at `(location, sink_handle)` into `candidates`.
pub fn check_flow(
    candidates: &mut CandidatesTable,
    location: Location,
    sink_handle: SinkHandle,
    source_tree: &Tree<ForwardTaint>,
    sink_tree: &Tree<BackwardTaint>,
    breadcrumbs: &BTreeSet<String>,
) {
    let mut candidate = Candidate::new(location, sink_handle);
    candidate.flows = match_flows(source_tree, sink_tree, breadcrumbs);
    candidates.insert(candidate);
}
