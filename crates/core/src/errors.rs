use thiserror::Error;

/// 远程配置客户端错误类型定义
///
/// Every failure surfaced by the client is a variant of this one enum, so a
/// caller can handle all configuration failures with a single match arm.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("配置未找到: env={env}, version={}", .version.as_deref().unwrap_or("<latest>"))]
    NotFound { env: String, version: Option<String> },

    #[error("同步检查失败: {0}")]
    Sync(String),

    #[error("配置数据错误: {0}")]
    Data(String),

    #[error("无效状态: {0}")]
    InvalidState(String),

    #[error("构建器错误: {0}")]
    Builder(String),

    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("网络错误: {0}")]
    Network(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("序列化错误: {0}")]
    Serialization(String),
}

/// 统一的Result类型
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn not_found<S: Into<String>>(env: S, version: Option<&str>) -> Self {
        Self::NotFound {
            env: env.into(),
            version: version.map(str::to_string),
        }
    }

    pub fn sync_error<S: Into<String>>(msg: S) -> Self {
        Self::Sync(msg.into())
    }

    pub fn data_error<S: Into<String>>(msg: S) -> Self {
        Self::Data(msg.into())
    }

    pub fn invalid_state<S: Into<String>>(msg: S) -> Self {
        Self::InvalidState(msg.into())
    }

    pub fn builder_error<S: Into<String>>(msg: S) -> Self {
        Self::Builder(msg.into())
    }

    pub fn storage_error<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    pub fn network_error<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }

    /// Failures caused by the network or the sync check, which a caller may
    /// reasonably retry later.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ConfigError::Network(_) | ConfigError::Sync(_))
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serialization(err.to_string())
    }
}
