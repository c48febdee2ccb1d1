pub mod handle_digest;
pub mod to_json;

pub use handle_digest::master_handle;
pub use to_json::to_json;
