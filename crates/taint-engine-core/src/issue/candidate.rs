use serde::{Deserialize, Serialize};

use crate::issue::flow::Flow;
use crate::model::location::Location;
use crate::model::sink_handle::SinkHandle;

/// All flows observed at a single (location, sink-handle) site, prior to
/// rule application.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Candidate {
    pub location: Location,
    pub sink_handle: SinkHandle,
    pub flows: Vec<Flow>,
}

impl Candidate {
    pub fn new(location: Location, sink_handle: SinkHandle) -> Self {
        Self {
            location,
            sink_handle,
            flows: Vec::new(),
        }
    }

    /// Join concatenates flows under the same key.
    pub fn join(&mut self, other: Candidate) {
        debug_assert_eq!(self.location, other.location);
        debug_assert_eq!(self.sink_handle, other.sink_handle);
        self.flows.extend(other.flows);
    }
}

#[cfg(test)]
mod tests {
    use super::Candidate;
    use crate::domain::frame::{CallInfo, Frame};
    use crate::domain::kind::Kind;
    use crate::domain::tree::{BackwardTaint, ForwardTaint};
    use crate::issue::flow::Flow;
    use crate::model::location::Location;
    use crate::model::sink_handle::SinkHandle;
    use taint_engine_sdk::TaintSide;

    fn frame() -> Frame {
        Frame::leaf(CallInfo::Origin {
            location: Location::new("a.py", 0, 1, 1, 1),
        })
    }

    #[test]
    fn join_concatenates_flows() {
        let sink_handle = SinkHandle::Global {
            kind: "db.execute".to_string(),
        };
        let mut a = Candidate::new(Location::new("a.py", 0, 1, 1, 1), sink_handle.clone());
        a.flows.push(Flow::new(
            ForwardTaint::singleton(Kind::new("UserControlled"), frame()),
            BackwardTaint::singleton(Kind::new("SqlInjection"), frame()),
        ));
        let mut b = Candidate::new(Location::new("a.py", 0, 1, 1, 1), sink_handle);
        b.flows.push(Flow::new(
            ForwardTaint::singleton(Kind::new("EnvVar"), frame()),
            BackwardTaint::singleton(Kind::new("SqlInjection"), frame()),
        ));

        a.join(b);
        assert_eq!(a.flows.len(), 2);
    }
}
