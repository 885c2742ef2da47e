//! Time-limited handler execution.

use chute_core::{BoxError, BoxHandler, Handler, Middleware, RouteRequest};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

/// Error returned when a handler runs past its deadline.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("handler timed out after {after:?}")]
pub struct TimeoutError {
    /// The configured deadline.
    pub after: Duration,
}

/// Fails a call with [`TimeoutError`] once it has run for `duration`.
///
/// The handler's future is dropped at the deadline, which releases the
/// request and its captured parameters.
#[derive(Debug, Clone, Copy)]
pub struct Timeout {
    duration: Duration,
}

impl Timeout {
    /// Create a timeout layer.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

impl<R, T> Middleware<R, T> for Timeout
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        BoxHandler::new(TimeLimited {
            duration: self.duration,
            inner,
        })
    }
}

struct TimeLimited<R, T> {
    duration: Duration,
    inner: BoxHandler<R, T>,
}

impl<R, T> Handler<R, T> for TimeLimited<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, request: RouteRequest<R>) -> Result<T, BoxError> {
        match timeout(self.duration, self.inner.call(request)).await {
            Ok(result) => result,
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(after = ?self.duration, "handler timed out");
                Err(Box::new(TimeoutError {
                    after: self.duration,
                }))
            }
        }
    }
}
