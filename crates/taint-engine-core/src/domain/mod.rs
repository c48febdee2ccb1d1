pub mod frame;
pub mod handle;
pub mod kind;
pub mod tree;

pub use frame::{CallInfo, ExtraTraceFrame, Frame, LeafKindRef};
pub use handle::IssueHandle;
pub use kind::{Kind, SanitizeTransforms};
pub use tree::{AccessPath, AccessStep, BackwardTaint, ForwardTaint, KindFrameMap, Tree};
