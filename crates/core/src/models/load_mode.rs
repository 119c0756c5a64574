use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// 加载模式
///
/// Fixed for the lifetime of a mediator; it is never chosen per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Serve only what the local store holds.
    #[serde(alias = "local", alias = "local-only")]
    LocalOnly,
    /// Always fetch, then persist the fetched snapshot.
    #[serde(alias = "remote", alias = "remote-only")]
    RemoteOnly,
    /// Serve the cache while it is current, refresh when it is stale.
    #[default]
    Hybrid,
}

impl LoadMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadMode::LocalOnly => "local_only",
            LoadMode::RemoteOnly => "remote_only",
            LoadMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for LoadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoadMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "local_only" | "local" => Ok(LoadMode::LocalOnly),
            "remote_only" | "remote" => Ok(LoadMode::RemoteOnly),
            "hybrid" => Ok(LoadMode::Hybrid),
            other => Err(ConfigError::InvalidArgument(format!(
                "未知的加载模式: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_load_mode() {
        assert_eq!("hybrid".parse::<LoadMode>().unwrap(), LoadMode::Hybrid);
        assert_eq!("Remote-Only".parse::<LoadMode>().unwrap(), LoadMode::RemoteOnly);
        assert_eq!("local".parse::<LoadMode>().unwrap(), LoadMode::LocalOnly);
        assert!(matches!(
            "sometimes".parse::<LoadMode>(),
            Err(ConfigError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_serde_accepts_parse_aliases() {
        for (alias, expected) in [
            ("\"local\"", LoadMode::LocalOnly),
            ("\"local-only\"", LoadMode::LocalOnly),
            ("\"remote\"", LoadMode::RemoteOnly),
            ("\"remote-only\"", LoadMode::RemoteOnly),
            ("\"hybrid\"", LoadMode::Hybrid),
        ] {
            let mode: LoadMode = serde_json::from_str(alias).unwrap();
            assert_eq!(mode, expected);
        }
        assert_eq!(
            serde_json::to_string(&LoadMode::RemoteOnly).unwrap(),
            "\"remote_only\""
        );
    }

    #[test]
    fn test_default_is_hybrid() {
        assert_eq!(LoadMode::default(), LoadMode::Hybrid);
        assert_eq!(LoadMode::default().to_string(), "hybrid");
    }
}
