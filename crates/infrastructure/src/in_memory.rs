use async_trait::async_trait;
use remote_config_core::{
    ConfigResult, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot, LocalStore,
    RawConfiguration, RemoteSource, SyncOutcome,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// 内存本地存储实现
///
/// Keeps a single snapshot in memory. Suited to tests, short-lived tools and
/// processes that only need the fallback within their own lifetime.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLocalStore {
    /// 当前缓存的快照
    snapshot: Arc<RwLock<Option<JsonSnapshot>>>,
}

impl InMemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用已有快照初始化存储
    pub fn seeded(snapshot: JsonSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Some(snapshot))),
        }
    }

    pub async fn snapshot(&self) -> Option<JsonSnapshot> {
        self.snapshot.read().await.clone()
    }
}

#[async_trait]
impl LocalStore for InMemoryLocalStore {
    async fn has_data(&self) -> ConfigResult<bool> {
        Ok(self.snapshot.read().await.is_some())
    }

    async fn get_metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
        Ok(self
            .snapshot
            .read()
            .await
            .as_ref()
            .and_then(|s| s.metadata.clone())
            .map(|m| Box::new(m) as Box<dyn ConfigurationMetadata>))
    }

    async fn get_configs(&self) -> ConfigResult<RawConfiguration> {
        Ok(self
            .snapshot
            .read()
            .await
            .as_ref()
            .map(|s| s.configs.clone())
            .unwrap_or_default())
    }

    async fn save_config(&self, snapshot: &dyn ConfigurationSnapshot) -> ConfigResult<()> {
        let captured = JsonSnapshot::capture(snapshot)?;
        debug!("内存存储保存配置: {} 个键", captured.configs.len());
        *self.snapshot.write().await = Some(captured);
        Ok(())
    }

    async fn clear_cache(&self) -> ConfigResult<()> {
        *self.snapshot.write().await = None;
        Ok(())
    }
}

/// 内存远程配置源实现
///
/// Serves snapshots registered per environment and optional version. A
/// versioned request with no exact entry is answered from the environment's
/// unversioned entry.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRemoteSource {
    /// (环境, 版本) -> 快照
    snapshots: Arc<RwLock<HashMap<(String, Option<String>), JsonSnapshot>>>,
}

impl InMemoryRemoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, env: &str, version: Option<&str>, snapshot: JsonSnapshot) {
        self.snapshots
            .write()
            .await
            .insert((env.to_string(), version.map(str::to_string)), snapshot);
    }

    pub async fn remove(&self, env: &str, version: Option<&str>) -> bool {
        self.snapshots
            .write()
            .await
            .remove(&(env.to_string(), version.map(str::to_string)))
            .is_some()
    }

    async fn lookup(&self, env: &str, version: Option<&str>) -> Option<JsonSnapshot> {
        let snapshots = self.snapshots.read().await;
        snapshots
            .get(&(env.to_string(), version.map(str::to_string)))
            .or_else(|| snapshots.get(&(env.to_string(), None)))
            .cloned()
    }
}

#[async_trait]
impl RemoteSource for InMemoryRemoteSource {
    async fn fetch(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<Option<Box<dyn ConfigurationSnapshot>>> {
        Ok(self
            .lookup(env, version)
            .await
            .map(|s| Box::new(s) as Box<dyn ConfigurationSnapshot>))
    }

    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        let outcome = match self.lookup(env, version).await {
            None => SyncOutcome::NotFound,
            Some(snapshot) if snapshot.sync_identifier() == Some(local.sync_identifier()) => {
                SyncOutcome::UpToDate
            }
            Some(_) => SyncOutcome::NeedsUpdate,
        };
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remote_config_core::SyncMetadata;
    use remote_config_testing_utils::{snapshot_with, UnreadableSnapshot};
    use serde_json::json;

    #[tokio::test]
    async fn test_store_round_trip_and_clear() {
        let store = InMemoryLocalStore::new();
        assert!(!store.has_data().await.unwrap());
        assert!(store.get_configs().await.unwrap().is_empty());

        store
            .save_config(&snapshot_with("test", "remote_value", "sync-456"))
            .await
            .unwrap();

        assert!(store.has_data().await.unwrap());
        assert_eq!(store.get_configs().await.unwrap()["test"], json!("remote_value"));
        let metadata = store.get_metadata().await.unwrap().unwrap();
        assert_eq!(metadata.sync_identifier(), "sync-456");

        store.clear_cache().await.unwrap();
        assert!(!store.has_data().await.unwrap());
        assert!(store.get_metadata().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_rejects_unreadable_snapshot_without_overwriting() {
        let store = InMemoryLocalStore::seeded(snapshot_with("test", "local_value", "sync-123"));

        let result = store.save_config(&UnreadableSnapshot).await;

        assert!(result.is_err());
        assert_eq!(store.get_configs().await.unwrap()["test"], json!("local_value"));
    }

    #[tokio::test]
    async fn test_remote_source_version_lookup_falls_back_to_unversioned() {
        let remote = InMemoryRemoteSource::new();
        remote
            .publish("prod", None, snapshot_with("test", "latest", "sync-2"))
            .await;
        remote
            .publish("prod", Some("1"), snapshot_with("test", "v1", "sync-1"))
            .await;

        let v1 = remote.fetch("prod", Some("1")).await.unwrap().unwrap();
        assert_eq!(v1.configs().unwrap()["test"], json!("v1"));

        let v9 = remote.fetch("prod", Some("9")).await.unwrap().unwrap();
        assert_eq!(v9.configs().unwrap()["test"], json!("latest"));

        assert!(remote.fetch("staging", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remote_source_check_compares_identifiers() {
        let remote = InMemoryRemoteSource::new();
        remote
            .publish("prod", None, snapshot_with("test", "latest", "sync-2"))
            .await;

        let current = SyncMetadata::new("sync-2");
        let stale = SyncMetadata::new("sync-1");
        assert_eq!(
            remote.check_for_updates(&current, "prod", None).await.unwrap(),
            SyncOutcome::UpToDate
        );
        assert_eq!(
            remote.check_for_updates(&stale, "prod", None).await.unwrap(),
            SyncOutcome::NeedsUpdate
        );
        assert_eq!(
            remote.check_for_updates(&stale, "qa", None).await.unwrap(),
            SyncOutcome::NotFound
        );

        assert!(remote.remove("prod", None).await);
        assert_eq!(
            remote.check_for_updates(&current, "prod", None).await.unwrap(),
            SyncOutcome::NotFound
        );
    }
}
