//! Tracing spans around handler calls.

use chute_core::{BoxError, BoxHandler, Handler, Middleware, RouteRequest};
use std::time::Instant;
use tracing::{Instrument, Level};

/// Runs each call inside a span carrying the method and route pattern.
///
/// Completion is logged at `DEBUG` with the elapsed time; handler errors are
/// logged at `WARN`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace {
    _priv: (),
}

impl Trace {
    /// Create a tracing layer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R, T> Middleware<R, T> for Trace
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        BoxHandler::new(Traced { inner })
    }
}

struct Traced<R, T> {
    inner: BoxHandler<R, T>,
}

impl<R, T> Handler<R, T> for Traced<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, request: RouteRequest<R>) -> Result<T, BoxError> {
        let span = tracing::span!(
            Level::DEBUG,
            "request",
            method = %request.method(),
            route = request.route()
        );
        let started = Instant::now();
        let result = self.inner.call(request).instrument(span.clone()).await;
        let elapsed = started.elapsed();
        match &result {
            Ok(_) => tracing::debug!(parent: &span, ?elapsed, "request handled"),
            Err(error) => tracing::warn!(parent: &span, ?elapsed, %error, "handler failed"),
        }
        result
    }
}
