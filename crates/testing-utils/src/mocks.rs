//! Mock implementations for all capability traits
//!
//! This module provides in-memory mock implementations that record how they
//! were called, so tests can assert on the decisions the mediator took
//! without a real transport or disk.

use async_trait::async_trait;
use remote_config_core::{
    ConfigError, ConfigResult, ConfigurationMetadata, ConfigurationSnapshot, JsonSnapshot,
    LocalStore, RawConfiguration, RemoteSource, SyncMetadata, SyncOutcome, SyncStrategy,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::builders::UnreadableSnapshot;

/// Canned answer for `RemoteSource::fetch`
#[derive(Debug, Clone)]
pub enum FetchResponse {
    Snapshot(JsonSnapshot),
    Unreadable,
    Absent,
    Fail(String),
}

/// Canned answer for a sync check
#[derive(Debug, Clone)]
pub enum CheckResponse {
    Outcome(SyncOutcome),
    Fail(String),
}

/// A recorded sync check call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCall {
    pub local_sync_identifier: String,
    pub env: String,
    pub version: Option<String>,
}

/// Mock implementation of RemoteSource for testing
#[derive(Debug)]
pub struct MockRemoteSource {
    fetch_response: Mutex<FetchResponse>,
    check_response: Mutex<CheckResponse>,
    fetch_calls: AtomicUsize,
    fetch_requests: Mutex<Vec<(String, Option<String>)>>,
    check_calls: Mutex<Vec<CheckCall>>,
}

impl MockRemoteSource {
    pub fn new() -> Self {
        Self {
            fetch_response: Mutex::new(FetchResponse::Absent),
            check_response: Mutex::new(CheckResponse::Outcome(SyncOutcome::UpToDate)),
            fetch_calls: AtomicUsize::new(0),
            fetch_requests: Mutex::new(Vec::new()),
            check_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_snapshot(self, snapshot: JsonSnapshot) -> Self {
        self.set_fetch_response(FetchResponse::Snapshot(snapshot));
        self
    }

    pub fn with_fetch_response(self, response: FetchResponse) -> Self {
        self.set_fetch_response(response);
        self
    }

    pub fn with_check_outcome(self, outcome: SyncOutcome) -> Self {
        *self.check_response.lock().unwrap() = CheckResponse::Outcome(outcome);
        self
    }

    pub fn with_check_failure(self, message: &str) -> Self {
        *self.check_response.lock().unwrap() = CheckResponse::Fail(message.to_string());
        self
    }

    pub fn set_fetch_response(&self, response: FetchResponse) {
        *self.fetch_response.lock().unwrap() = response;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_requests(&self) -> Vec<(String, Option<String>)> {
        self.fetch_requests.lock().unwrap().clone()
    }

    pub fn check_count(&self) -> usize {
        self.check_calls.lock().unwrap().len()
    }

    pub fn check_calls(&self) -> Vec<CheckCall> {
        self.check_calls.lock().unwrap().clone()
    }
}

impl Default for MockRemoteSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteSource for MockRemoteSource {
    async fn fetch(
        &self,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<Option<Box<dyn ConfigurationSnapshot>>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_requests
            .lock()
            .unwrap()
            .push((env.to_string(), version.map(str::to_string)));

        let response = self.fetch_response.lock().unwrap().clone();
        match response {
            FetchResponse::Snapshot(snapshot) => Ok(Some(Box::new(snapshot))),
            FetchResponse::Unreadable => Ok(Some(Box::new(UnreadableSnapshot))),
            FetchResponse::Absent => Ok(None),
            FetchResponse::Fail(message) => Err(ConfigError::Network(message)),
        }
    }

    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        self.check_calls.lock().unwrap().push(CheckCall {
            local_sync_identifier: local.sync_identifier().to_string(),
            env: env.to_string(),
            version: version.map(str::to_string),
        });

        let response = self.check_response.lock().unwrap().clone();
        match response {
            CheckResponse::Outcome(outcome) => Ok(outcome),
            CheckResponse::Fail(message) => Err(ConfigError::Network(message)),
        }
    }

    fn name(&self) -> &str {
        "mock-remote"
    }
}

/// Mock implementation of LocalStore for testing
#[derive(Debug, Default)]
pub struct MockLocalStore {
    snapshot: Mutex<Option<JsonSnapshot>>,
    reports_data_when_empty: Mutex<bool>,
    fail_reads: Mutex<bool>,
    fail_saves: Mutex<bool>,
    save_calls: AtomicUsize,
    configs_calls: AtomicUsize,
    clear_calls: AtomicUsize,
}

impl MockLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: JsonSnapshot) -> Self {
        let store = Self::new();
        *store.snapshot.lock().unwrap() = Some(snapshot);
        store
    }

    /// `has_data()` answers true even though nothing usable is stored
    pub fn reporting_phantom_data(self) -> Self {
        *self.reports_data_when_empty.lock().unwrap() = true;
        self
    }

    pub fn failing_reads(self) -> Self {
        *self.fail_reads.lock().unwrap() = true;
        self
    }

    pub fn failing_saves(self) -> Self {
        *self.fail_saves.lock().unwrap() = true;
        self
    }

    pub fn stored(&self) -> Option<JsonSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn configs_read_count(&self) -> usize {
        self.configs_calls.load(Ordering::SeqCst)
    }

    pub fn clear_count(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocalStore for MockLocalStore {
    async fn has_data(&self) -> ConfigResult<bool> {
        if *self.reports_data_when_empty.lock().unwrap() {
            return Ok(true);
        }
        Ok(self.snapshot.lock().unwrap().is_some())
    }

    async fn get_metadata(&self) -> ConfigResult<Option<Box<dyn ConfigurationMetadata>>> {
        let metadata = self
            .snapshot
            .lock()
            .unwrap()
            .as_ref()
            .and_then(|s| s.metadata.clone());
        Ok(metadata.map(|m| Box::new(m) as Box<dyn ConfigurationMetadata>))
    }

    async fn get_configs(&self) -> ConfigResult<RawConfiguration> {
        self.configs_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_reads.lock().unwrap() {
            return Err(ConfigError::storage_error("mock store read failure"));
        }
        Ok(self
            .snapshot
            .lock()
            .unwrap()
            .as_ref()
            .map(|s| s.configs.clone())
            .unwrap_or_default())
    }

    async fn save_config(&self, snapshot: &dyn ConfigurationSnapshot) -> ConfigResult<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_saves.lock().unwrap() {
            return Err(ConfigError::storage_error("mock store write failure"));
        }
        let captured = JsonSnapshot::capture(snapshot)?;
        *self.snapshot.lock().unwrap() = Some(captured);
        Ok(())
    }

    async fn clear_cache(&self) -> ConfigResult<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        *self.snapshot.lock().unwrap() = None;
        Ok(())
    }
}

/// Mock implementation of SyncStrategy for testing
#[derive(Debug)]
pub struct MockSyncStrategy {
    response: Mutex<CheckResponse>,
    calls: Mutex<Vec<CheckCall>>,
    remote_names: Mutex<Vec<String>>,
}

impl MockSyncStrategy {
    pub fn returning(outcome: SyncOutcome) -> Self {
        Self {
            response: Mutex::new(CheckResponse::Outcome(outcome)),
            calls: Mutex::new(Vec::new()),
            remote_names: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Mutex::new(CheckResponse::Fail(message.to_string())),
            calls: Mutex::new(Vec::new()),
            remote_names: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CheckCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Names of the remote sources handed to the strategy
    pub fn remote_names(&self) -> Vec<String> {
        self.remote_names.lock().unwrap().clone()
    }
}

#[async_trait]
impl SyncStrategy for MockSyncStrategy {
    async fn check_for_updates(
        &self,
        local: &dyn ConfigurationMetadata,
        remote: &dyn RemoteSource,
        env: &str,
        version: Option<&str>,
    ) -> ConfigResult<SyncOutcome> {
        self.calls.lock().unwrap().push(CheckCall {
            local_sync_identifier: local.sync_identifier().to_string(),
            env: env.to_string(),
            version: version.map(str::to_string),
        });
        self.remote_names
            .lock()
            .unwrap()
            .push(remote.name().to_string());

        let response = self.response.lock().unwrap().clone();
        match response {
            CheckResponse::Outcome(outcome) => Ok(outcome),
            CheckResponse::Fail(message) => Err(ConfigError::sync_error(message)),
        }
    }

    fn name(&self) -> &str {
        "mock-strategy"
    }
}

/// Metadata value for calling strategies directly in tests
pub fn metadata(sync_identifier: &str) -> SyncMetadata {
    SyncMetadata::new(sync_identifier)
}
