//! Tower integration for chute.
//!
//! [`RouterService`] exposes a frozen [`Router`] as a `tower::Service`, which
//! is the boundary a transport plugs into. The service never fails for a
//! miss: `NotFound` and `MethodNotAllowed` come back as [`Outcome`] values
//! for the transport to render as 404 and 405 (with an `Allow` header built
//! from the carried [`MethodSet`](chute_core::MethodSet)).
//!
//! # Example
//!
//! ```rust,ignore
//! use chute_std::tower::{Incoming, RouterService};
//!
//! let service = RouterService::new(router);
//!
//! // Now usable with tower middleware
//! let with_timeout = tower::timeout::Timeout::new(service, Duration::from_secs(5));
//! ```

use chute_core::{BoxError, Outcome, Router};
use futures::future::BoxFuture;
use std::{
    sync::Arc,
    task::{Context, Poll},
};
use ::tower::Service;

/// A request as seen by the transport: method, raw path and the payload
/// handed to the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Incoming<R> {
    /// Method name, e.g. `GET`.
    pub method: String,
    /// Request path, without query string.
    pub path: String,
    /// Payload passed to the handler as [`RouteRequest::inner`](chute_core::RouteRequest::inner).
    pub body: R,
}

impl<R> Incoming<R> {
    /// Create an incoming request.
    pub fn new(method: impl Into<String>, path: impl Into<String>, body: R) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            body,
        }
    }
}

/// Wraps a [`Router`] as a tower `Service`.
///
/// Cloning is cheap; every clone serves the same router.
pub struct RouterService<R, T> {
    router: Arc<Router<R, T>>,
}

impl<R, T> RouterService<R, T> {
    /// Serve `router`.
    pub fn new(router: Router<R, T>) -> Self {
        Self::from_arc(Arc::new(router))
    }

    /// Serve a router that is already shared.
    pub fn from_arc(router: Arc<Router<R, T>>) -> Self {
        Self { router }
    }

    /// The served router.
    pub fn router(&self) -> &Arc<Router<R, T>> {
        &self.router
    }
}

impl<R, T> Clone for RouterService<R, T> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
        }
    }
}

impl<R, T> Service<Incoming<R>> for RouterService<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    type Response = Outcome<T>;
    type Error = BoxError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        // The router holds no per-connection state
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Incoming<R>) -> Self::Future {
        let router = Arc::clone(&self.router);
        Box::pin(async move {
            router
                .handle(&request.method, &request.path, request.body)
                .await
        })
    }
}
