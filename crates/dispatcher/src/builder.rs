use std::sync::Arc;

use remote_config_core::{ConfigError, ConfigResult, LoadMode, LocalStore, RemoteSource, SyncStrategy};

use crate::mediator::ConfigMediator;

/// Mediator builder - fluent assembly of a `ConfigMediator`
///
/// The remote source and the local store are mandatory; `build` fails
/// immediately when either is missing. The strategy, mode and name have
/// defaults (no strategy, `Hybrid`, `"default"`).
#[derive(Default)]
pub struct ConfigMediatorBuilder {
    remote: Option<Arc<dyn RemoteSource>>,
    local: Option<Arc<dyn LocalStore>>,
    strategy: Option<Arc<dyn SyncStrategy>>,
    mode: LoadMode,
    name: Option<String>,
}

impl ConfigMediatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remote_source(mut self, remote: Arc<dyn RemoteSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn local_store(mut self, local: Arc<dyn LocalStore>) -> Self {
        self.local = Some(local);
        self
    }

    pub fn sync_strategy(mut self, strategy: Arc<dyn SyncStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Set or unset the strategy in one call, for wiring driven by settings.
    pub fn maybe_sync_strategy(mut self, strategy: Option<Arc<dyn SyncStrategy>>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn load_mode(mut self, mode: LoadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Name reported in the mediator's tracing span.
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> ConfigResult<ConfigMediator> {
        let remote = self
            .remote
            .ok_or_else(|| ConfigError::builder_error("缺少远程配置源 (remote_source)"))?;
        let local = self
            .local
            .ok_or_else(|| ConfigError::builder_error("缺少本地存储 (local_store)"))?;

        Ok(ConfigMediator::from_parts(
            remote,
            local,
            self.strategy,
            self.mode,
            self.name.unwrap_or_else(|| "default".to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_config_core::SyncOutcome;
    use remote_config_testing_utils::{MockLocalStore, MockRemoteSource, MockSyncStrategy};

    #[test]
    fn test_build_requires_remote_source() {
        let result = ConfigMediatorBuilder::new()
            .local_store(Arc::new(MockLocalStore::new()))
            .build();
        match result {
            Err(ConfigError::Builder(message)) => assert!(message.contains("remote_source")),
            other => panic!("expected builder error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_requires_local_store() {
        let result = ConfigMediatorBuilder::new()
            .remote_source(Arc::new(MockRemoteSource::new()))
            .build();
        match result {
            Err(ConfigError::Builder(message)) => assert!(message.contains("local_store")),
            other => panic!("expected builder error, got {other:?}"),
        }
    }

    #[test]
    fn test_build_defaults() {
        let mediator = ConfigMediatorBuilder::new()
            .remote_source(Arc::new(MockRemoteSource::new()))
            .local_store(Arc::new(MockLocalStore::new()))
            .build()
            .unwrap();

        assert_eq!(mediator.load_mode(), LoadMode::Hybrid);
        assert_eq!(mediator.name(), "default");
        assert_eq!(mediator.strategy_name(), None);
        assert!(!mediator.is_loaded());
    }

    #[test]
    fn test_build_with_optional_parts() {
        let mediator = ConfigMediatorBuilder::new()
            .remote_source(Arc::new(MockRemoteSource::new()))
            .local_store(Arc::new(MockLocalStore::new()))
            .sync_strategy(Arc::new(MockSyncStrategy::returning(SyncOutcome::UpToDate)))
            .load_mode(LoadMode::LocalOnly)
            .name("checkout-service")
            .build()
            .unwrap();

        assert_eq!(mediator.load_mode(), LoadMode::LocalOnly);
        assert_eq!(mediator.name(), "checkout-service");
        assert_eq!(mediator.strategy_name(), Some("mock-strategy"));
    }
}
