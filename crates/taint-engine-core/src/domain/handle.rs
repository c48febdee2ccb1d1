use serde::{Deserialize, Serialize};

use crate::model::sink_handle::SinkHandle;
use crate::model::target::Target;

/// Stable identifier for an issue: `{code, callable, sink}`. Two issues
/// with an equal handle are joinable and, outside lineage-analysis mode,
/// MUST be joined rather than kept as separate issues.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct IssueHandle {
    pub code: i64,
    pub callable: Target,
    pub sink: SinkHandle,
}

impl IssueHandle {
    pub fn new(code: i64, callable: Target, sink: SinkHandle) -> Self {
        Self { code, callable, sink }
    }
}

#[cfg(test)]
mod tests {
    use super::{IssueHandle, SinkHandle, Target};

    #[test]
    fn handles_with_different_codes_are_distinct() {
        let callable = Target::Function {
            name: "f".to_string(),
        };
        let sink = SinkHandle::Global {
            kind: "db.execute".to_string(),
        };
        let a = IssueHandle::new(1, callable.clone(), sink.clone());
        let b = IssueHandle::new(2, callable, sink);
        assert_ne!(a, b);
    }
}
