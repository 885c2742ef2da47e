//! Testing utilities for Chute.
//!
//! This module provides handlers that make routing tests easier to write.
//!
//! # Features
//!
//! - [`RecordingHandler`]: records the route and parameters of every call
//! - [`CountingHandler`]: counts invocations
//! - [`FailingHandler`]: always fails with a fixed message
//! - [`request`]: dispatches a payload-less request through a router

use chute_core::{BoxError, Handler, Method, Outcome, RouteRequest, Router};
use parking_lot::Mutex;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// One call observed by a [`RecordingHandler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The resolved method.
    pub method: Method,
    /// Pattern of the matched route.
    pub route: String,
    /// Captured parameters, in path order.
    pub params: Vec<(String, String)>,
}

impl RecordedCall {
    /// Captured value for `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// A handler that records every call and responds with `T::default()`.
///
/// # Example
///
/// ```rust
/// use chute_core::Router;
/// use chute_std::testing::{RecordingHandler, request};
///
/// # futures::executor::block_on(async {
/// let recorder = RecordingHandler::new();
/// let mut builder = Router::<(), ()>::builder();
/// builder.get("/book/:id", recorder.clone()).unwrap();
/// let router = builder.build();
///
/// request(&router, "GET", "/book/42").await.unwrap();
///
/// let calls = recorder.calls();
/// assert_eq!(calls.len(), 1);
/// assert_eq!(calls[0].param("id"), Some("42"));
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingHandler {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a clone of the recorded calls.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Get the number of recorded calls.
    pub fn count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }
}

impl<R, T> Handler<R, T> for RecordingHandler
where
    R: Send + 'static,
    T: Default + Send + 'static,
{
    async fn call(&self, request: RouteRequest<R>) -> Result<T, BoxError> {
        let call = RecordedCall {
            method: request.method(),
            route: request.route().to_owned(),
            params: request
                .params()
                .iter()
                .map(|(n, v)| (n.to_owned(), v.to_owned()))
                .collect(),
        };
        self.calls.lock().push(call);
        Ok(T::default())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl<R, T> Handler<R, T> for CountingHandler
where
    R: Send + 'static,
    T: Default + Send + 'static,
{
    async fn call(&self, _request: RouteRequest<R>) -> Result<T, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(T::default())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that always fails with the same message.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    message: Arc<str>,
}

impl FailingHandler {
    /// Fail every call with `message`.
    pub fn new(message: impl Into<Arc<str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl<R, T> Handler<R, T> for FailingHandler
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, _request: RouteRequest<R>) -> Result<T, BoxError> {
        Err(self.message.to_string().into())
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Run `method path` through `router` with an empty payload.
pub async fn request<T>(router: &Router<(), T>, method: &str, path: &str) -> Result<Outcome<T>, BoxError>
where
    T: Send + 'static,
{
    router.handle(method, path, ()).await
}
