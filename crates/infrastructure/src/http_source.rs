//! HTTP远程配置源
//!
//! Endpoints, relative to `base_url`:
//!
//! - `GET environments/{env}/config[?version=v]` returns a [`JsonSnapshot`]
//!   document; 404 means the configuration does not exist.
//! - `GET environments/{env}/sync[?version=v]` with
//!   `If-None-Match: "<sync identifier>"` answers 304 when the cached copy is
//!   current, or 200 with `{"sync_identifier": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use remote_config_core::{
    ConfigError, ConfigResult, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot,
    RemoteSource, SyncOutcome,
};
use reqwest::header::{AUTHORIZATION, IF_NONE_MATCH};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpRemoteConfig {
    /// 配置服务根地址
    pub base_url: String,
    /// 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 可选的Bearer令牌
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpRemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

pub struct HttpRemoteSource {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpRemoteSource {
    pub fn new(config: HttpRemoteConfig) -> ConfigResult<Self> {
        let mut base = config.base_url.trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base).map_err(|e| {
            ConfigError::InvalidArgument(format!("无效的远程地址 {}: {e}", config.base_url))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::network_error(format!("创建HTTP客户端失败: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, env: &str, resource: &str, version: Option<&str>) -> ConfigResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConfigError::InvalidArgument("远程地址不能作为基础路径".to_string()))?
            .pop_if_empty()
            .extend(["environments", env, resource]);
        if let Some(version) = version {
            url.query_pairs_mut().append_pair("version", version);
        }
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    sync_identifier: String,
}

#[async_trait]
impl RemoteSource for HttpRemoteSource {
    #[instrument(skip(self))]
    async fn fetch(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<Option<Box<dyn ConfigurationSnapshot>>> {
        let url = self.endpoint(env, "config", version)?;
        let response = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| ConfigError::network_error(format!("请求远程配置失败: {e}")))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("远程配置不存在");
                Ok(None)
            }
            status if status.is_success() => {
                let snapshot: JsonSnapshot = response.json().await.map_err(|e| {
                    ConfigError::Serialization(format!("远程配置响应无法解析: {e}"))
                })?;
                debug!("远程配置拉取成功: {} 个键", snapshot.configs.len());
                Ok(Some(Box::new(snapshot)))
            }
            status => Err(ConfigError::network_error(format!(
                "远程配置服务返回错误状态: {status}"
            ))),
        }
    }

    #[instrument(skip(self, local), fields(local_sync = %local.sync_identifier()))]
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        let url = self.endpoint(env, "sync", version)?;
        let request = self
            .authorize(self.client.get(url))
            .header(IF_NONE_MATCH, format!("\"{}\"", local.sync_identifier()));

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("同步检查请求失败: {}", e);
                return Ok(SyncOutcome::Error);
            }
        };

        let outcome = match response.status() {
            StatusCode::NOT_MODIFIED => SyncOutcome::UpToDate,
            StatusCode::NOT_FOUND => SyncOutcome::NotFound,
            status if status.is_success() => match response.json::<SyncResponse>().await {
                Ok(body) if body.sync_identifier == local.sync_identifier() => {
                    SyncOutcome::UpToDate
                }
                Ok(_) => SyncOutcome::NeedsUpdate,
                Err(e) => {
                    warn!("同步检查响应无法解析: {}", e);
                    SyncOutcome::Error
                }
            },
            status => {
                warn!("同步检查返回异常状态: {}", status);
                SyncOutcome::Error
            }
        };
        Ok(outcome)
    }

    fn name(&self) -> &str {
        "http"
    }
}
