use serde::{Deserialize, Serialize};

use taint_engine_sdk::TaintSide;

use crate::domain::tree::{BackwardTaint, ForwardTaint};

/// A pair of source and sink taint representing one potential flow at a
/// site. Bottom iff either side is bottom.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub source: ForwardTaint,
    pub sink: BackwardTaint,
}

impl Flow {
    pub fn new(source: ForwardTaint, sink: BackwardTaint) -> Self {
        Self { source, sink }
    }

    pub fn is_bottom(&self) -> bool {
        self.source.is_bottom() || self.sink.is_bottom()
    }

    pub fn join(&self, other: &Self) -> Self {
        Self {
            source: self.source.join(&other.source),
            sink: self.sink.join(&other.sink),
        }
    }
}
