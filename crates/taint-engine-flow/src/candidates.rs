use std::collections::BTreeMap;

use taint_engine_core::issue::Candidate;
use taint_engine_core::model::{Location, SinkHandle};

/// Per-definition table of candidates, keyed by (location, sink-handle).
/// Owned exclusively by one worker's analysis of one definition; consumed
/// at issue generation.
#[derive(Clone, Debug, Default)]
pub struct CandidatesTable {
    entries: BTreeMap<(Location, SinkHandle), Candidate>,
}

impl CandidatesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `candidate`'s flows under its key, joining with whatever is
    /// already recorded there.
    pub fn insert(&mut self, candidate: Candidate) {
        let key = (candidate.location.clone(), candidate.sink_handle.clone());
        self.entries
            .entry(key)
            .and_modify(|existing| existing.join(candidate.clone()))
            .or_insert(candidate);
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
