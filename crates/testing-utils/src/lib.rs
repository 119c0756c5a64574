//! # Remote Config Testing Utils
//!
//! Shared testing utilities for the remote configuration client.
//! This crate provides recording mock implementations of every capability
//! trait and builders for snapshot test data.
//!
//! ## Usage
//!
//! Add this crate as a dev-dependency:
//!
//! ```toml
//! [dev-dependencies]
//! remote-config-testing-utils = { path = "../testing-utils" }
//! ```
//!
//! Then use the mocks in your tests:
//!
//! ```rust
//! use remote_config_testing_utils::{MockLocalStore, MockRemoteSource, SnapshotBuilder};
//! ```

pub mod builders;
pub mod mocks;

// Re-export commonly used items
pub use builders::*;
pub use mocks::*;
