//! Mediator Composition
//!
//! This crate holds the load orchestration engine: the `ConfigMediator`
//! decision procedure, its validated builder and the built-in sync
//! strategies that can be plugged into it.

pub mod builder;
pub mod mediator;
pub mod strategies;

pub use builder::ConfigMediatorBuilder;
pub use mediator::ConfigMediator;
pub use strategies::*;
