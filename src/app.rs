use std::sync::Arc;

use anyhow::{Context, Result};
use remote_config_core::{LocalStore, RemoteSource, ResolvedConfiguration};
use remote_config_dispatcher::{strategy_by_name, ConfigMediator};
use remote_config_infrastructure::{FileLocalStore, HttpRemoteSource};
use tracing::info;

use crate::settings::ClientSettings;

/// 主应用程序
///
/// Wires the configured collaborators into a mediator and runs load /
/// cache maintenance on behalf of the CLI.
pub struct Application {
    settings: ClientSettings,
    mediator: ConfigMediator,
}

impl Application {
    /// Build the HTTP source and JSON file store described by `settings`.
    pub fn new(settings: ClientSettings) -> Result<Self> {
        settings.validate()?;

        let remote = HttpRemoteSource::new(settings.remote.clone())
            .context("创建HTTP远程配置源失败")?;
        let store = FileLocalStore::new(&settings.store.path);
        info!(
            "初始化远程配置客户端: remote={} store={}",
            remote.base_url(),
            store.path().display()
        );

        Self::with_collaborators(settings, Arc::new(remote), Arc::new(store))
    }

    /// Build around caller-supplied collaborators; mode, strategy and name
    /// still come from `settings`.
    pub fn with_collaborators(
        settings: ClientSettings,
        remote: Arc<dyn RemoteSource>,
        store: Arc<dyn LocalStore>,
    ) -> Result<Self> {
        let strategy = strategy_by_name(&settings.client.strategy)?;
        let mediator = ConfigMediator::builder()
            .remote_source(remote)
            .local_store(store)
            .maybe_sync_strategy(strategy)
            .load_mode(settings.client.mode)
            .name(settings.client.name.clone())
            .build()?;

        Ok(Self { settings, mediator })
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn mediator(&self) -> &ConfigMediator {
        &self.mediator
    }

    /// Load for the given environment/version, defaulting to the configured
    /// ones, and return what was resolved.
    pub async fn load(
        &self,
        env: Option<&str>,
        version: Option<&str>,
    ) -> Result<ResolvedConfiguration> {
        let env = env.unwrap_or(&self.settings.client.environment);
        let version = version.or(self.settings.client.version.as_deref());

        self.mediator
            .load(env, version)
            .await
            .with_context(|| format!("加载配置失败: env={env}"))?;

        self.mediator
            .resolved()
            .ok_or_else(|| anyhow::anyhow!("加载成功但没有已解析的配置"))
    }

    pub async fn clear_cache(&self) -> Result<()> {
        self.mediator
            .clear_local_cache()
            .await
            .context("清除本地配置缓存失败")
    }
}
