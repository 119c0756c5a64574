use std::collections::HashMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConfigResult;

/// Loosely typed key-value configuration as delivered by a backend.
pub type RawConfiguration = HashMap<String, Value>;

/// Freshness information attached to a snapshot.
///
/// The sync identifier is an opaque token (version, ETag, timestamp, hash...)
/// compared for equality by sync strategies. The client never parses it.
pub trait ConfigurationMetadata: Debug + Send + Sync {
    fn sync_identifier(&self) -> &str;
}

/// One fetched instance of backend configuration data.
///
/// Extraction is fallible so that backends with their own payload encoding
/// can report a malformed payload instead of yielding partial data.
pub trait ConfigurationSnapshot: Debug + Send + Sync {
    fn configs(&self) -> ConfigResult<RawConfiguration>;

    fn metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>>;
}

/// 同步元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncMetadata {
    pub sync_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SyncMetadata {
    pub fn new<S: Into<String>>(sync_identifier: S) -> Self {
        Self {
            sync_identifier: sync_identifier.into(),
            updated_at: None,
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Copies any metadata implementation into the serializable form.
    pub fn from_metadata(metadata: &dyn ConfigurationMetadata) -> Self {
        Self::new(metadata.sync_identifier())
    }
}

impl ConfigurationMetadata for SyncMetadata {
    fn sync_identifier(&self) -> &str {
        &self.sync_identifier
    }
}

/// JSON快照
///
/// The serializable snapshot shape used by the bundled stores and sources.
/// On the wire and on disk it looks like:
///
/// ```json
/// {"configs": {"feature_x": true}, "metadata": {"sync_identifier": "sync-123"}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonSnapshot {
    #[serde(default)]
    pub configs: RawConfiguration,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SyncMetadata>,
}

impl JsonSnapshot {
    pub fn new(configs: RawConfiguration, metadata: Option<SyncMetadata>) -> Self {
        Self { configs, metadata }
    }

    /// Extracts both parts of an arbitrary snapshot up front, so a failed
    /// extraction never leaves a half-built value behind.
    pub fn capture(snapshot: &dyn ConfigurationSnapshot) -> ConfigResult<Self> {
        let configs = snapshot.configs()?;
        let metadata = snapshot
            .metadata()?
            .map(|metadata| SyncMetadata::from_metadata(metadata.as_ref()));
        Ok(Self { configs, metadata })
    }

    pub fn sync_identifier(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.sync_identifier.as_str())
    }
}

impl ConfigurationSnapshot for JsonSnapshot {
    fn configs(&self) -> ConfigResult<RawConfiguration> {
        Ok(self.configs.clone())
    }

    fn metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
        Ok(self
            .metadata
            .clone()
            .map(|m| Box::new(m) as Box<dyn ConfigurationMetadata>))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use serde_json::json;

    #[derive(Debug)]
    struct BrokenSnapshot;

    impl ConfigurationSnapshot for BrokenSnapshot {
        fn configs(&self) -> ConfigResult<RawConfiguration> {
            Ok(RawConfiguration::new())
        }

        fn metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
            Err(ConfigError::data_error("metadata field malformed"))
        }
    }

    #[test]
    fn test_json_snapshot_wire_format() {
        let snapshot: JsonSnapshot = serde_json::from_value(json!({
            "configs": {"test": "remote_value", "retries": 3},
            "metadata": {"sync_identifier": "sync-456"}
        }))
        .unwrap();

        assert_eq!(snapshot.configs["test"], json!("remote_value"));
        assert_eq!(snapshot.configs["retries"], json!(3));
        assert_eq!(snapshot.sync_identifier(), Some("sync-456"));
    }

    #[test]
    fn test_json_snapshot_without_metadata() {
        let snapshot: JsonSnapshot = serde_json::from_value(json!({"configs": {}})).unwrap();
        assert!(snapshot.metadata().unwrap().is_none());

        let encoded = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(encoded, json!({"configs": {}}));
    }

    #[test]
    fn test_capture_propagates_extraction_failure() {
        let result = JsonSnapshot::capture(&BrokenSnapshot);
        assert!(matches!(result, Err(ConfigError::Data(_))));
    }

    #[test]
    fn test_capture_copies_metadata() {
        let mut configs = RawConfiguration::new();
        configs.insert("test".to_string(), json!("value"));
        let original = JsonSnapshot::new(configs, Some(SyncMetadata::new("etag-1")));

        let captured = JsonSnapshot::capture(&original).unwrap();
        assert_eq!(captured, original);
    }
}
