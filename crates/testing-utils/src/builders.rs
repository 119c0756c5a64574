//! Test data builders for creating snapshots
//!
//! This module provides builder patterns for creating test data with
//! sensible defaults and easy customization.

use remote_config_core::{
    ConfigError, ConfigResult, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot,
    RawConfiguration, SyncMetadata,
};
use serde_json::Value;

/// Builder for creating test JsonSnapshot values
pub struct SnapshotBuilder {
    snapshot: JsonSnapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            snapshot: JsonSnapshot::default(),
        }
    }

    pub fn with_value<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.snapshot.configs.insert(key.to_string(), value.into());
        self
    }

    pub fn with_configs(mut self, configs: RawConfiguration) -> Self {
        self.snapshot.configs = configs;
        self
    }

    pub fn with_sync_identifier(mut self, sync_identifier: &str) -> Self {
        self.snapshot.metadata = Some(SyncMetadata::new(sync_identifier));
        self
    }

    pub fn without_metadata(mut self) -> Self {
        self.snapshot.metadata = None;
        self
    }

    pub fn build(self) -> JsonSnapshot {
        self.snapshot
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A snapshot whose configuration extraction always fails
#[derive(Debug, Clone, Default)]
pub struct UnreadableSnapshot;

impl ConfigurationSnapshot for UnreadableSnapshot {
    fn configs(&self) -> ConfigResult<RawConfiguration> {
        Err(ConfigError::data_error("payload is not a key-value object"))
    }

    fn metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
        Ok(Some(Box::new(SyncMetadata::new("unreadable"))))
    }
}

/// Shorthand for a single-key snapshot with metadata
pub fn snapshot_with(key: &str, value: &str, sync_identifier: &str) -> JsonSnapshot {
    SnapshotBuilder::new()
        .with_value(key, value)
        .with_sync_identifier(sync_identifier)
        .build()
}
