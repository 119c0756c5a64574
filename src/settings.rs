use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use remote_config_core::LoadMode;
use remote_config_dispatcher::strategy_by_name;
use remote_config_infrastructure::HttpRemoteConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 环境变量前缀，例如 `REMOTE_CONFIG__CLIENT__ENVIRONMENT=staging`
pub const ENV_PREFIX: &str = "REMOTE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    pub client: ClientSection,
    pub remote: HttpRemoteConfig,
    pub store: StoreSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSection {
    /// 编排器名称，出现在日志字段中
    pub name: String,
    pub mode: LoadMode,
    pub environment: String,
    #[serde(default)]
    pub version: Option<String>,
    /// remote | always_refresh | identifier | version_pin
    pub strategy: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    /// json | pretty
    pub format: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            client: ClientSection {
                name: "remote-config".to_string(),
                mode: LoadMode::Hybrid,
                environment: "production".to_string(),
                version: None,
                strategy: "remote".to_string(),
            },
            remote: HttpRemoteConfig::default(),
            store: StoreSettings {
                path: ".remote-config/cache.json".to_string(),
            },
            logging: LoggingSettings {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

impl ClientSettings {
    /// Load settings from defaults, an optional TOML file and
    /// `REMOTE_CONFIG__*` environment variables, in increasing priority.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = Self::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("client.name", defaults.client.name)?
            .set_default("client.mode", defaults.client.mode.as_str())?
            .set_default("client.environment", defaults.client.environment)?
            .set_default("client.strategy", defaults.client.strategy)?
            .set_default("remote.base_url", defaults.remote.base_url)?
            .set_default("remote.timeout_secs", defaults.remote.timeout_secs)?
            .set_default("store.path", defaults.store.path)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", defaults.logging.format)?;

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        );

        let settings: Self = builder
            .build()
            .context("构建客户端配置失败")?
            .try_deserialize()
            .context("解析客户端配置失败")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.client.environment.trim().is_empty() {
            return Err(anyhow::anyhow!("client.environment 不能为空"));
        }
        if self.remote.base_url.trim().is_empty() {
            return Err(anyhow::anyhow!("remote.base_url 不能为空"));
        }
        if self.remote.timeout_secs == 0 {
            return Err(anyhow::anyhow!("remote.timeout_secs 必须大于0"));
        }
        if self.store.path.trim().is_empty() {
            return Err(anyhow::anyhow!("store.path 不能为空"));
        }
        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            return Err(anyhow::anyhow!(
                "不支持的日志格式: {}",
                self.logging.format
            ));
        }
        strategy_by_name(&self.client.strategy)
            .with_context(|| format!("client.strategy 无效: {}", self.client.strategy))?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化客户端配置失败")
    }
}
