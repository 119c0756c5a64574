use async_trait::async_trait;

use crate::models::{ConfigurationMetadata, ConfigurationSnapshot, SyncOutcome};
use crate::ConfigResult;

/// 远程配置源接口
///
/// Implementations own the transport: request encoding, timeouts and
/// cancellation all live behind this trait.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    /// Fetch the full snapshot for `env`.
    ///
    /// An ordinary "no such configuration" answer is `Ok(None)`; `Err` is
    /// reserved for faults.
    async fn fetch(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<Option<Box<dyn ConfigurationSnapshot>>>;

    /// Lightweight freshness check that must not transfer the full payload.
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome>;

    fn name(&self) -> &str {
        "remote"
    }
}
