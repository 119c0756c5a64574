//! 配置编排器
//!
//! `ConfigMediator` combines a load mode, an optional sync strategy and the
//! remote/local pair into one decision per `load` call:
//!
//! | mode | procedure |
//! |---|---|
//! | `LocalOnly` | local store only; empty store is `NotFound` |
//! | `RemoteOnly` | fetch, persist, serve the fetched data |
//! | `Hybrid` | serve the cache while current, refresh when stale, fall back to the cache when the check is inconclusive |
//!
//! The resolved configuration is replaced as a whole at the end of a
//! successful load. No lock is held across an await point, so concurrent
//! loads on one mediator interleave and the last one to finish wins.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, info, instrument, warn};

use remote_config_core::{
    ConfigError, ConfigOrigin, ConfigResult, ConfigurationMetadata, LoadMode, LocalStore, Mapper,
    RawConfiguration, RemoteSource, ResolvedConfiguration, SyncOutcome, SyncStrategy,
};

use crate::builder::ConfigMediatorBuilder;

pub struct ConfigMediator {
    remote: Arc<dyn RemoteSource>,
    local: Arc<dyn LocalStore>,
    strategy: Option<Arc<dyn SyncStrategy>>,
    mode: LoadMode,
    name: String,
    resolved: RwLock<Option<ResolvedConfiguration>>,
}

impl ConfigMediator {
    /// Hybrid mediator without a sync strategy.
    pub fn new(remote: Arc<dyn RemoteSource>, local: Arc<dyn LocalStore>) -> Self {
        Self::from_parts(remote, local, None, LoadMode::default(), "default".to_string())
    }

    pub fn builder() -> ConfigMediatorBuilder {
        ConfigMediatorBuilder::new()
    }

    pub(crate) fn from_parts(
        remote: Arc<dyn RemoteSource>,
        local: Arc<dyn LocalStore>,
        strategy: Option<Arc<dyn SyncStrategy>>,
        mode: LoadMode,
        name: String,
    ) -> Self {
        Self {
            remote,
            local,
            strategy,
            mode,
            name,
            resolved: RwLock::new(None),
        }
    }

    pub fn load_mode(&self) -> LoadMode {
        self.mode
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the configured sync strategy, if any.
    pub fn strategy_name(&self) -> Option<&str> {
        self.strategy.as_deref().map(|s| s.name())
    }

    /// Resolve the configuration for `env` according to the load mode.
    ///
    /// On success the resolved state is replaced; on failure the previously
    /// resolved configuration (if any) stays in place.
    #[instrument(skip(self), fields(mediator = %self.name, mode = %self.mode))]
    pub async fn load(&self, env: &str, version: Option<&str>) -> ConfigResult<()> {
        if env.trim().is_empty() {
            return Err(ConfigError::InvalidArgument(
                "环境名称不能为空".to_string(),
            ));
        }

        let (configs, origin) = match self.mode {
            LoadMode::LocalOnly => self.load_local_only(env, version).await?,
            LoadMode::RemoteOnly => self.load_remote(env, version).await?,
            LoadMode::Hybrid => self.load_hybrid(env, version).await?,
        };

        info!(
            "配置加载完成: env={} 来源={:?} 键数量={}",
            env,
            origin,
            configs.len()
        );

        let resolved = ResolvedConfiguration::new(configs, origin, env, version);
        *self
            .resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(resolved);
        Ok(())
    }

    /// Convert the resolved configuration into an application type.
    ///
    /// Fails with `InvalidState` until a load has succeeded.
    pub fn dispatch<T, M>(&self, mapper: M) -> ConfigResult<T>
    where
        M: Mapper<T>,
    {
        let configs = self.raw_configuration()?;
        Ok(mapper.map(&configs))
    }

    /// The resolved key-value data, shared rather than copied.
    pub fn raw_configuration(&self) -> ConfigResult<Arc<RawConfiguration>> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|resolved| Arc::clone(&resolved.configs))
            .ok_or_else(|| {
                ConfigError::invalid_state("尚未成功加载配置，请先调用 load()")
            })
    }

    pub fn resolved(&self) -> Option<ResolvedConfiguration> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clear the local store. The already resolved configuration is kept.
    pub async fn clear_local_cache(&self) -> ConfigResult<()> {
        self.local.clear_cache().await?;
        info!("本地配置缓存已清除: mediator={}", self.name);
        Ok(())
    }

    async fn load_local_only(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<(RawConfiguration, ConfigOrigin)> {
        if !self.local.has_data().await? {
            debug!("本地存储没有配置数据");
            return Err(ConfigError::not_found(env, version));
        }
        let configs = self.read_local().await?;
        Ok((configs, ConfigOrigin::Cache))
    }

    async fn load_remote(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<(RawConfiguration, ConfigOrigin)> {
        debug!("从远程源拉取配置: remote={}", self.remote.name());
        let snapshot = match self.remote.fetch(env, version).await? {
            Some(snapshot) => snapshot,
            None => {
                warn!("远程源没有找到配置: env={} version={:?}", env, version);
                return Err(ConfigError::not_found(env, version));
            }
        };

        let configs = snapshot
            .configs()
            .map_err(|e| ConfigError::data_error(format!("提取远程配置失败: {e}")))?;

        self.local
            .save_config(snapshot.as_ref())
            .await
            .map_err(|e| ConfigError::data_error(format!("保存配置到本地存储失败: {e}")))?;

        Ok((configs, ConfigOrigin::Remote))
    }

    async fn load_hybrid(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<(RawConfiguration, ConfigOrigin)> {
        if !self.local.has_data().await? {
            debug!("本地存储为空，强制远程刷新");
            return self.load_remote(env, version).await;
        }

        let metadata = match self.local.get_metadata().await? {
            Some(metadata) => metadata,
            None => {
                debug!("本地配置缺少元数据，无法判断新鲜度，强制远程刷新");
                return self.load_remote(env, version).await;
            }
        };

        let outcome = self.check_for_updates(metadata.as_ref(), env, version).await?;
        debug!(
            "同步检查结果: {} (本地同步标识: {})",
            outcome,
            metadata.sync_identifier()
        );

        match outcome {
            SyncOutcome::UpToDate => Ok((self.read_local().await?, ConfigOrigin::Cache)),
            SyncOutcome::NeedsUpdate => self.load_remote(env, version).await,
            SyncOutcome::NotFound | SyncOutcome::Error => {
                warn!(
                    "同步检查未能确认远程状态({})，回退到本地缓存: env={}",
                    outcome, env
                );
                Ok((self.read_local().await?, ConfigOrigin::Fallback(outcome)))
            }
        }
    }

    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        let result = match self.strategy.as_deref() {
            Some(strategy) => {
                debug!("使用同步策略: {}", strategy.name());
                strategy
                    .check_for_updates(local, self.remote.as_ref(), env, version)
                    .await
            }
            None => self.remote.check_for_updates(local, env, version).await,
        };
        result.map_err(|e| ConfigError::sync_error(format!("同步检查执行失败: {e}")))
    }

    /// Read the full local data; a store that claims to have data but yields
    /// nothing usable is a data error.
    async fn read_local(&self) -> ConfigResult<RawConfiguration> {
        let configs = self
            .local
            .get_configs()
            .await
            .map_err(|e| ConfigError::data_error(format!("读取本地配置失败: {e}")))?;
        if configs.is_empty() {
            return Err(ConfigError::data_error("本地存储报告有数据，但读取结果为空"));
        }
        Ok(configs)
    }
}

impl std::fmt::Debug for ConfigMediator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigMediator")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("remote", &self.remote.name())
            .field("strategy", &self.strategy_name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_config_testing_utils::{snapshot_with, MockLocalStore, MockRemoteSource};

    #[tokio::test]
    async fn test_empty_environment_rejected() {
        let mediator = ConfigMediator::new(
            Arc::new(MockRemoteSource::new()),
            Arc::new(MockLocalStore::new()),
        );

        let result = mediator.load("  ", None).await;
        assert!(matches!(result, Err(ConfigError::InvalidArgument(_))));
        assert!(!mediator.is_loaded());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_configuration() {
        let remote = Arc::new(
            MockRemoteSource::new().with_snapshot(snapshot_with("test", "first", "sync-1")),
        );
        let mediator = ConfigMediator::builder()
            .remote_source(remote.clone())
            .local_store(Arc::new(MockLocalStore::new()))
            .load_mode(LoadMode::RemoteOnly)
            .build()
            .unwrap();

        mediator.load("prod", None).await.unwrap();
        remote.set_fetch_response(remote_config_testing_utils::FetchResponse::Absent);

        let result = mediator.load("prod", None).await;
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));

        let value = mediator
            .dispatch(|raw: &RawConfiguration| raw["test"].clone())
            .unwrap();
        assert_eq!(value, serde_json::json!("first"));
    }

    #[tokio::test]
    async fn test_resolution_records_origin_and_key() {
        let local = Arc::new(MockLocalStore::with_snapshot(snapshot_with(
            "test",
            "local_value",
            "sync-123",
        )));
        let mediator = ConfigMediator::new(Arc::new(MockRemoteSource::new()), local);

        mediator.load("prod", Some("2.0")).await.unwrap();

        let resolved = mediator.resolved().unwrap();
        assert_eq!(resolved.origin, ConfigOrigin::Cache);
        assert_eq!(resolved.env, "prod");
        assert_eq!(resolved.version.as_deref(), Some("2.0"));
        assert_eq!(resolved.len(), 1);
    }
}
