//! JSON文件本地存储
//!
//! Persists the last saved snapshot as a single pretty-printed JSON
//! document. Writes go to a sibling temporary file that is renamed over the
//! target, so a crash mid-write leaves the previous document intact.
//! Writes and removals on one store (and its clones) are serialised, since
//! they share that temporary file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use remote_config_core::{
    ConfigError, ConfigResult, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot,
    LocalStore, RawConfiguration,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct FileLocalStore {
    /// 快照文件路径
    path: PathBuf,
    /// 写入锁，保护临时文件与替换操作
    write_lock: Arc<Mutex<()>>,
}

impl FileLocalStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "snapshot.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_snapshot(&self) -> ConfigResult<Option<JsonSnapshot>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ConfigError::storage_error(format!(
                    "读取配置文件失败 {}: {e}",
                    self.path.display()
                )))
            }
        };

        let snapshot = serde_json::from_str(&content).map_err(|e| {
            ConfigError::Serialization(format!(
                "配置文件格式错误 {}: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(snapshot))
    }
}

#[async_trait]
impl LocalStore for FileLocalStore {
    async fn has_data(&self) -> ConfigResult<bool> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ConfigError::storage_error(format!(
                "检查配置文件失败 {}: {e}",
                self.path.display()
            ))),
        }
    }

    async fn get_metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
        Ok(self
            .read_snapshot()
            .await?
            .and_then(|s| s.metadata)
            .map(|m| Box::new(m) as Box<dyn ConfigurationMetadata>))
    }

    async fn get_configs(&self) -> ConfigResult<RawConfiguration> {
        Ok(self
            .read_snapshot()
            .await?
            .map(|s| s.configs)
            .unwrap_or_default())
    }

    #[instrument(skip(self, snapshot), fields(path = %self.path.display()))]
    async fn save_config(&self, snapshot: &dyn ConfigurationSnapshot) -> ConfigResult<()> {
        let captured = JsonSnapshot::capture(snapshot)?;
        let content = serde_json::to_string_pretty(&captured)?;

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ConfigError::storage_error(format!("创建目录失败 {}: {e}", parent.display()))
            })?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, content.as_bytes())
            .await
            .map_err(|e| ConfigError::storage_error(format!("写入临时文件失败: {e}")))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(|e| ConfigError::storage_error(format!("替换配置文件失败: {e}")))?;

        debug!("配置快照已写入: {} 个键", captured.configs.len());
        Ok(())
    }

    async fn clear_cache(&self) -> ConfigResult<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("已删除配置缓存文件: {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::storage_error(format!(
                "删除配置文件失败 {}: {e}",
                self.path.display()
            ))),
        }
    }
}
