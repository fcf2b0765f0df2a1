//! # Dispatch: the registry, fan-out loop, and shared default instance.
//!
//! This module provides:
//! - [`Dispatcher`] - type-keyed listener registry with synchronous,
//!   reentrancy-safe delivery
//! - [`default_dispatcher`] - shared per-thread instance for call sites
//!   that do not want explicit wiring
//!
//! See the [`Dispatcher`] docs for the reentrancy rules.

mod default;
mod dispatcher;

pub use default::default_dispatcher;
pub use dispatcher::Dispatcher;
