use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::handle::IssueHandle;
use crate::issue::flow::Flow;
use crate::model::location::Location;
use crate::model::target::Target;

/// A flow that matched a rule, keyed by its handle for downstream
/// deduplication. Two issues with an equal handle must be joined outside
/// lineage-analysis mode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Issue {
    pub flow: Flow,
    pub handle: IssueHandle,
    pub locations: BTreeSet<Location>,
    pub define: Target,
}

impl Issue {
    pub fn new(flow: Flow, handle: IssueHandle, location: Location, define: Target) -> Self {
        Self {
            flow,
            handle,
            locations: BTreeSet::from([location]),
            define,
        }
    }

    /// The minimum location under the total order on `Location`.
    pub fn canonical_location(&self) -> &Location {
        self.locations
            .iter()
            .min()
            .expect("an issue always carries at least one location")
    }

    /// Flow join, handle unchanged (the caller guarantees equal handles),
    /// location set unioned, define unchanged.
    pub fn join(&mut self, other: Issue) {
        debug_assert_eq!(self.handle, other.handle);
        self.flow = self.flow.join(&other.flow);
        self.locations.extend(other.locations);
    }
}
