//! # chute-std
//!
//! Standard collaborators for the Chute request router.
//!
//! This crate provides:
//! - **Middleware**: [`ConcurrencyLimit`](middleware::ConcurrencyLimit),
//!   [`BurstLimit`](middleware::BurstLimit),
//!   [`SetRequestId`](middleware::SetRequestId), plus `Timeout` (feature
//!   `timeout`) and `Trace` (feature `tracing`)
//! - **Tower adapter**: `RouterService` (feature `tower`)
//! - **Validation**: a rule registry and field visitor (feature `validate`)
//! - **Testing**: recording and counting handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use chute_core;

// Modules
pub mod middleware;
pub mod testing;
#[cfg(feature = "tower")]
pub mod tower;
#[cfg(feature = "validate")]
pub mod validate;
