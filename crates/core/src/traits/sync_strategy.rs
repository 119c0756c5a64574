use async_trait::async_trait;

use super::RemoteSource;
use crate::models::{ConfigurationMetadata, SyncOutcome};
use crate::ConfigResult;

/// 同步检查策略接口
///
/// Replaces the remote source's built-in freshness check, e.g. with ETag
/// comparison, version pinning or content hashing. When a mediator has a
/// strategy the remote source's own check is not called.
#[async_trait]
pub trait SyncStrategy: Send + Sync {
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        remote: &dyn RemoteSource,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome>;

    fn name(&self) -> &str;
}
