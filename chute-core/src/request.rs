//! The value a handler receives.

use crate::{extensions::Extensions, method::Method, params::Params};
use std::sync::Arc;

/// A matched request on its way to a handler.
///
/// Owns the captured [`Params`], so the pooled capture buffer stays alive
/// exactly as long as the request does, and is returned to the pool when the
/// handler drops it, whether it returned, failed, panicked or was cancelled.
#[derive(Debug)]
pub struct RouteRequest<R> {
    method: Method,
    route: Arc<str>,
    params: Params,
    extensions: Extensions,
    inner: R,
}

impl<R> RouteRequest<R> {
    /// Create a request for `route` carrying the caller's `inner` value.
    pub fn new(method: Method, route: Arc<str>, params: Params, inner: R) -> Self {
        Self {
            method,
            route,
            params,
            extensions: Extensions::new(),
            inner,
        }
    }

    /// The resolved method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Pattern of the matched route, e.g. `/book/:id`.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Captured path parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Shorthand for `self.params().get(name)`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Values attached by middleware.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to the attached values.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// The caller's request value.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Mutable access to the caller's request value.
    pub fn inner_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consumes the request, returning the caller's value.
    ///
    /// The captured params are released here.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Replaces the caller's value, keeping route data and extensions.
    pub fn map<U>(self, f: impl FnOnce(R) -> U) -> RouteRequest<U> {
        RouteRequest {
            method: self.method,
            route: self.route,
            params: self.params,
            extensions: self.extensions,
            inner: f(self.inner),
        }
    }
}
