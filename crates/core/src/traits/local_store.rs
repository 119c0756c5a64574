use async_trait::async_trait;

use crate::models::{ConfigurationMetadata, ConfigurationSnapshot, RawConfiguration};
use crate::ConfigResult;

/// 本地缓存存储接口
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn has_data(&self) -> ConfigResult<bool>;

    async fn get_metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>>;

    /// Returns an empty map when nothing is stored.
    async fn get_configs(&self) -> ConfigResult<RawConfiguration>;

    /// Persist a snapshot. Both the configs and the metadata are extracted
    /// before anything is written; a failed extraction leaves the stored data
    /// untouched.
    async fn save_config(&self, snapshot: &dyn ConfigurationSnapshot) -> ConfigResult<()>;

    async fn clear_cache(&self) -> ConfigResult<()>;
}
