//! # chute - Request-Path Router
//!
//! `chute` resolves `(method, path)` pairs to handlers through a segment
//! graph whose topology is checked at registration time. Matching walks
//! forward one segment at a time and never backtracks; wildcard values are
//! captured into pooled buffers that are returned on every exit path.
//!
//! ## Quick Start
//!
//! ```rust
//! use chute::prelude::*;
//!
//! # futures::executor::block_on(async {
//! let mut builder = Router::builder();
//! builder
//!     .get("/hello/:name", |req: RouteRequest<()>| async move {
//!         Ok(format!("hello, {}", req.param("name").unwrap_or("stranger")))
//!     })
//!     .unwrap();
//! let router = builder.build();
//!
//! assert_eq!(
//!     router.handle("GET", "/hello/ferris", ()).await.unwrap(),
//!     Outcome::Handled("hello, ferris".to_string())
//! );
//! assert_eq!(router.handle("GET", "/bye", ()).await.unwrap(), Outcome::NotFound);
//! # });
//! ```
//!
//! ## Features
//!
//! - `tracing` (default): registration, build and dispatch events, and the
//!   [`Trace`](middleware::Trace) middleware
//! - `timeout`: the [`Timeout`](middleware::Timeout) middleware (tokio)
//! - `tower`: [`RouterService`](tower::RouterService)
//! - `validate`: the rule-registry validator

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use chute_core::{
    // Errors
    BoxError,
    // Handler
    BoxHandler,
    // Request data
    Context,
    ContextPool,
    // Router
    Dispatch,
    DynHandler,
    Extensions,
    Found,
    Handler,
    InvalidPathKind,
    // Graph
    Match,
    // Methods
    Method,
    MethodSet,
    // Middleware
    Middleware,
    Outcome,
    Params,
    // Pool
    Pool,
    PoolStats,
    Pooled,
    Reset,
    RouteError,
    RouteGraph,
    RouteInfo,
    RouteRequest,
    Router,
    RouterBuilder,
    graph,
    path,
    pool,
};

/// Standard middleware.
pub mod middleware {
    #![allow(clippy::wildcard_imports)]
    pub use chute_std::middleware::*;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use chute_std::testing::*;
}

/// Tower integration.
#[cfg(feature = "tower")]
pub mod tower {
    #![allow(clippy::wildcard_imports)]
    pub use chute_std::tower::*;
}

/// Field validation.
#[cfg(feature = "validate")]
pub mod validate {
    #![allow(clippy::wildcard_imports)]
    pub use chute_std::validate::*;
}

/// Prelude module - common imports for Chute.
///
/// # Usage
///
/// ```rust
/// use chute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, BoxHandler, Dispatch, Handler, Method, MethodSet, Middleware, Outcome, Params,
        RouteError, RouteRequest, Router, RouterBuilder,
    };
}
