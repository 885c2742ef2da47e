//! # Middleware
//!
//! A middleware is a pure transform from one handler to another. The router
//! applies its middleware stack once per handler, at registration time, so
//! dispatch only ever sees the already-wrapped handler.
//!
//! # Ordering
//!
//! Layers are applied in registration order: the first layer wraps the bare
//! handler, the next wraps that, and so on. The layer registered **last** is
//! therefore outermost; it observes the request first and may short-circuit
//! before the inner layers run.
//!
//! # Example
//!
//! ```rust
//! use chute_core::{BoxError, BoxHandler, Handler, RouteRequest, Router};
//!
//! // Rejects any request whose body is empty.
//! fn non_empty(inner: BoxHandler<String, String>) -> BoxHandler<String, String> {
//!     BoxHandler::new(move |req: RouteRequest<String>| {
//!         let inner = inner.clone();
//!         async move {
//!             if req.inner().is_empty() {
//!                 return Err::<String, BoxError>("empty body".into());
//!             }
//!             inner.call(req).await
//!         }
//!     })
//! }
//!
//! let mut builder = Router::builder();
//! builder.layer(non_empty);
//! builder
//!     .post("/echo", |req: RouteRequest<String>| async move { Ok(req.into_inner()) })
//!     .unwrap();
//! let router = builder.build();
//! # let _ = router;
//! ```

use crate::handler::BoxHandler;
use std::{fmt, sync::Arc};

/// A handler-to-handler transform.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a middleware for `BoxHandler<{R}, {T}>`",
    label = "missing `Middleware<{R}, {T}>` implementation",
    note = "Middleware must implement `wrap(BoxHandler<{R}, {T}>) -> BoxHandler<{R}, {T}>`."
)]
pub trait Middleware<R, T>: Send + Sync + 'static {
    /// Wraps `inner`, returning the handler to register instead.
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T>;
}

// Blanket impl for plain functions and closures
impl<F, R, T> Middleware<R, T> for F
where
    F: Fn(BoxHandler<R, T>) -> BoxHandler<R, T> + Send + Sync + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        (self)(inner)
    }
}

/// Ordered list of layers, applied in registration order.
pub(crate) struct Stack<R, T> {
    layers: Vec<Arc<dyn Middleware<R, T>>>,
}

impl<R: 'static, T: 'static> Stack<R, T> {
    pub(crate) fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub(crate) fn push(&mut self, layer: Arc<dyn Middleware<R, T>>) {
        self.layers.push(layer);
    }

    pub(crate) fn len(&self) -> usize {
        self.layers.len()
    }

    /// Wraps `handler` so the last pushed layer ends up outermost.
    pub(crate) fn apply(&self, handler: BoxHandler<R, T>) -> BoxHandler<R, T> {
        self.layers
            .iter()
            .fold(handler, |handler, layer| layer.wrap(handler))
    }
}

impl<R, T> fmt::Debug for Stack<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stack")
            .field("layers", &self.layers.len())
            .finish()
    }
}
