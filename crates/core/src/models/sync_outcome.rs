use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of asking whether the cached configuration is still current.
///
/// `Error` is a value: a check that could not reach a verdict. A check that
/// raises is reported as [`crate::ConfigError::Sync`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncOutcome {
    UpToDate,
    NeedsUpdate,
    NotFound,
    Error,
}

impl SyncOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::UpToDate => "up_to_date",
            SyncOutcome::NeedsUpdate => "needs_update",
            SyncOutcome::NotFound => "not_found",
            SyncOutcome::Error => "error",
        }
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
