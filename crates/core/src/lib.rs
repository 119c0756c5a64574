//! 远程配置客户端核心契约
//!
//! Data model, capability traits and the error taxonomy shared by the
//! mediator and every backend implementation.

pub mod errors;
pub mod models;
pub mod traits;

pub use errors::*;
pub use models::{
    ConfigOrigin, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot, LoadMode,
    RawConfiguration, ResolvedConfiguration, SyncMetadata, SyncOutcome,
};
pub use traits::{JsonMapper, LocalStore, Mapper, RemoteSource, SyncStrategy};
