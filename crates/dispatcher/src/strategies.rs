use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use remote_config_core::{
    ConfigError, ConfigResult, ConfigurationMetadata, RemoteSource, SyncOutcome, SyncStrategy,
};

/// Delegates to the remote source's own check. Equivalent to configuring no
/// strategy; useful when wiring is driven by a strategy name.
pub struct RemoteCheckStrategy;

/// Always reports the cache as stale, turning hybrid mode into
/// "refresh on every load, serve cache only when the remote is unreachable".
pub struct AlwaysRefreshStrategy;

/// Fetches the remote snapshot and compares sync identifiers.
///
/// Costs a full transfer per check; meant for backends without a lightweight
/// freshness endpoint.
pub struct IdentifierComparisonStrategy;

/// Treats the requested version as the expected sync identifier.
pub struct VersionPinStrategy;

impl RemoteCheckStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RemoteCheckStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncStrategy for RemoteCheckStrategy {
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        remote: &dyn RemoteSource,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        remote.check_for_updates(local, env, version).await
    }

    fn name(&self) -> &str {
        "RemoteCheck"
    }
}

impl AlwaysRefreshStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AlwaysRefreshStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncStrategy for AlwaysRefreshStrategy {
    async fn check_for_updates(
        &self,
        _local: &dyn ConfigurationMetadata,
        _remote: &dyn RemoteSource,
        _env: &str,
        _version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        Ok(SyncOutcome::NeedsUpdate)
    }

    fn name(&self) -> &str {
        "AlwaysRefresh"
    }
}

impl IdentifierComparisonStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IdentifierComparisonStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncStrategy for IdentifierComparisonStrategy {
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        remote: &dyn RemoteSource,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        let snapshot = match remote.fetch(env, version).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                debug!("远程源没有配置: env={}", env);
                return Ok(SyncOutcome::NotFound);
            }
            Err(e) => {
                warn!("拉取远程快照失败，无法比较同步标识: {}", e);
                return Ok(SyncOutcome::Error);
            }
        };

        let remote_metadata = match snapshot.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("远程快照元数据无法解析: {}", e);
                return Ok(SyncOutcome::Error);
            }
        };

        let outcome = match remote_metadata {
            Some(metadata) if metadata.sync_identifier() == local.sync_identifier() => {
                SyncOutcome::UpToDate
            }
            _ => SyncOutcome::NeedsUpdate,
        };

        debug!(
            "同步标识比较: 本地={} 结果={}",
            local.sync_identifier(),
            outcome
        );
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "IdentifierComparison"
    }
}

impl VersionPinStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VersionPinStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SyncStrategy for VersionPinStrategy {
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        remote: &dyn RemoteSource,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        match version {
            Some(requested) if requested == local.sync_identifier() => Ok(SyncOutcome::UpToDate),
            Some(requested) => {
                debug!(
                    "本地版本 {} 与请求版本 {} 不一致",
                    local.sync_identifier(),
                    requested
                );
                Ok(SyncOutcome::NeedsUpdate)
            }
            None => remote.check_for_updates(local, env, version).await,
        }
    }

    fn name(&self) -> &str {
        "VersionPin"
    }
}

/// Look up a built-in strategy by its settings name.
///
/// `"remote"` (and `"none"`) map to no strategy, so the mediator falls back
/// to the remote source's own check.
pub fn strategy_by_name(name: &str) -> ConfigResult<Option<Arc<dyn SyncStrategy>>> {
    let strategy: Arc<dyn SyncStrategy> = match name.trim().to_lowercase().as_str() {
        "remote" | "none" | "" => return Ok(None),
        "remote_check" => Arc::new(RemoteCheckStrategy::new()),
        "always_refresh" => Arc::new(AlwaysRefreshStrategy::new()),
        "identifier" | "identifier_comparison" => Arc::new(IdentifierComparisonStrategy::new()),
        "version_pin" => Arc::new(VersionPinStrategy::new()),
        other => {
            return Err(ConfigError::InvalidArgument(format!(
                "未知的同步策略: {other}"
            )))
        }
    };
    Ok(Some(strategy))
}
