//! # Handlers
//!
//! A handler is the terminal endpoint of a route: it receives the matched
//! [`RouteRequest`] and produces the caller's response type `T`, or fails.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|req: RouteRequest<R>| async move { ... }`
//! 2. **Struct implementation**: `impl Handler<R, T> for MyHandler`
//!
//! Handlers are stored type-erased as [`BoxHandler`], which is also what
//! [`Middleware`](crate::Middleware) receives and returns.

use crate::{error::BoxError, request::RouteRequest};
use futures::future::BoxFuture;
use std::{fmt, future::Future, sync::Arc};

/// The endpoint invoked for a matched route.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle requests of type `RouteRequest<{R}>`",
    label = "missing `Handler<{R}, {T}>` implementation",
    note = "Closures must take a `RouteRequest<{R}>` and return a future of `Result<{T}, BoxError>`."
)]
pub trait Handler<R, T>: Send + Sync + 'static {
    /// Handles one request.
    fn call(&self, request: RouteRequest<R>) -> impl Future<Output = Result<T, BoxError>> + Send;
}

// Blanket impl for closures
impl<F, Fut, R, T> Handler<R, T> for F
where
    F: Fn(RouteRequest<R>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, BoxError>> + Send,
{
    fn call(&self, request: RouteRequest<R>) -> impl Future<Output = Result<T, BoxError>> + Send {
        (self)(request)
    }
}

/// Object-safe version of [`Handler`].
pub trait DynHandler<R, T>: Send + Sync + 'static {
    /// Handles one request (dynamic dispatch version).
    fn call_dyn(&self, request: RouteRequest<R>) -> BoxFuture<'_, Result<T, BoxError>>;
}

impl<R, T, H> DynHandler<R, T> for H
where
    R: Send + 'static,
    T: Send + 'static,
    H: Handler<R, T>,
{
    fn call_dyn(&self, request: RouteRequest<R>) -> BoxFuture<'_, Result<T, BoxError>> {
        Box::pin(self.call(request))
    }
}

/// A type-erased, cheaply clonable handler.
pub struct BoxHandler<R, T>(Arc<dyn DynHandler<R, T>>);

impl<R, T> BoxHandler<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    /// Erase `handler`.
    pub fn new<H: Handler<R, T>>(handler: H) -> Self {
        Self(Arc::new(handler))
    }
}

impl<R, T> Clone for BoxHandler<R, T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<R, T> fmt::Debug for BoxHandler<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoxHandler")
    }
}

impl<R, T> Handler<R, T> for BoxHandler<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn call(&self, request: RouteRequest<R>) -> impl Future<Output = Result<T, BoxError>> + Send {
        self.0.call_dyn(request)
    }
}
