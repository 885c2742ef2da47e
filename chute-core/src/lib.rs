//! # chute-core
//!
//! Core of the Chute request-path router: a segment graph built from
//! `(method, path pattern, handler)` registrations, and a forward-only
//! matcher that resolves each `(method, path)` to exactly one handler.
//!
//! This crate has minimal dependencies. Ready-made middleware, the `tower`
//! adapter and the validator live in `chute-std`.
//!
//! # Path Syntax
//!
//! - segments are separated by `/` and the path starts with `/`;
//! - a segment starting with `:` captures the request segment under the
//!   name that follows, e.g. `/book/:id`;
//! - trailing slashes are insignificant;
//! - there are no optional, catch-all or regex segments.
//!
//! A literal and a wildcard can never be siblings, and neither can two
//! differently named wildcards. Such registrations fail with
//! [`RouteError::TopologyConflict`], which is what allows the matcher to
//! walk the graph without backtracking.
//!
//! # Lifecycle
//!
//! 1. **Build**: register routes and middleware on a [`RouterBuilder`].
//!    Every failure is a [`RouteError`] and should abort startup.
//! 2. **Freeze**: [`RouterBuilder::build`] yields an immutable [`Router`].
//! 3. **Serve**: [`Router::dispatch`] / [`Router::handle`] from any number
//!    of tasks. Captured parameters live in pooled buffers that return to
//!    the [`ContextPool`] when the request is dropped.
//!
//! # Modules
//!
//! - [`path`] - segment tokenizer
//! - [`graph`] - route graph and registrar
//! - [`pool`] - generic reusable-object pool

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod error;
mod extensions;
pub mod graph;
mod handler;
mod matcher;
mod method;
mod middleware;
mod params;
pub mod path;
pub mod pool;
mod request;
mod router;

// Re-exports
pub use error::{BoxError, InvalidPathKind, RouteError};
pub use extensions::Extensions;
pub use graph::{RouteGraph, RouteInfo};
pub use handler::{BoxHandler, DynHandler, Handler};
pub use matcher::Match;
pub use method::{Method, MethodSet};
pub use middleware::Middleware;
pub use params::{Context, ContextPool, Params};
pub use pool::{Pool, PoolStats, Pooled, Reset};
pub use request::RouteRequest;
pub use router::{Dispatch, Found, Outcome, Router, RouterBuilder};
