use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{RawConfiguration, SyncOutcome};

/// Where a resolved configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigOrigin {
    /// Freshly fetched from the remote source and persisted locally.
    Remote,
    /// Read from the local store, either by mode or because it was current.
    Cache,
    /// Served from the local store because the sync check was inconclusive.
    Fallback(SyncOutcome),
}

impl ConfigOrigin {
    pub fn is_remote(&self) -> bool {
        matches!(self, ConfigOrigin::Remote)
    }
}

/// The configuration a mediator holds after a successful load.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfiguration {
    pub configs: Arc<RawConfiguration>,
    pub origin: ConfigOrigin,
    pub env: String,
    pub version: Option<String>,
    pub resolved_at: DateTime<Utc>,
}

impl ResolvedConfiguration {
    pub fn new(
        configs: RawConfiguration,
        origin: ConfigOrigin,
        env: &str,
        version: Option<&str>,
    ) -> Self {
        Self {
            configs: Arc::new(configs),
            origin,
            env: env.to_string(),
            version: version.map(str::to_string),
            resolved_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
