pub mod location;
pub mod sink_handle;
pub mod target;

pub use location::*;
pub use sink_handle::*;
pub use target::*;
