//! 能力接口定义
//!
//! 编排器只依赖这些抽象，从不依赖具体的后端实现：
//! - `RemoteSource` - 远程配置源（完整拉取与轻量同步检查）
//! - `LocalStore` - 本地缓存存储
//! - `SyncStrategy` - 可选的同步检查策略
//! - `Mapper` - 原始配置到应用类型的转换

pub mod local_store;
pub mod mapper;
pub mod remote_source;
pub mod sync_strategy;

pub use local_store::*;
pub use mapper::*;
pub use remote_source::*;
pub use sync_strategy::*;
