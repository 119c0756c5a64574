pub mod file_store;
pub mod http_source;
pub mod in_memory;

pub use file_store::*;
pub use http_source::*;
pub use in_memory::*;
