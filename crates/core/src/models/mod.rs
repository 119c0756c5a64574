//! # 数据模型
//!
//! 定义远程配置客户端的核心数据结构。
//!
//! ## 核心模型
//!
//! ### RawConfiguration - 原始配置
//! 字符串键到任意JSON值的映射，成功加载后由Mapper转换为应用配置对象。
//!
//! ### ConfigurationSnapshot / ConfigurationMetadata - 快照契约
//! 每个后端载荷必须向核心暴露的形状：原始配置提取与可选的同步标识。
//!
//! ### SyncOutcome / LoadMode - 封闭枚举
//! 同步检查结果与加载模式，穷举匹配由编译器保证。
//!
//! ### ResolvedConfiguration - 已解析配置
//! 编排器在一次成功加载后持有的状态。

pub mod load_mode;
pub mod resolution;
pub mod snapshot;
pub mod sync_outcome;

pub use load_mode::LoadMode;
pub use resolution::{ConfigOrigin, ResolvedConfiguration};
pub use snapshot::{
    ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot, RawConfiguration, SyncMetadata,
};
pub use sync_outcome::SyncOutcome;
