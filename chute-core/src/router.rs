//! # Router
//!
//! Two phases, two types:
//!
//! - [`RouterBuilder`] owns the route graph mutably. Routes and middleware
//!   are registered here, single-threaded, before any traffic.
//! - [`Router`] is the frozen result of [`RouterBuilder::build`]. It only
//!   hands out shared references to the graph, so any number of requests can
//!   be matched concurrently without locking. The parameter pool is the only
//!   state it mutates while serving, and that is internally synchronized.
//!
//! To change routes while serving, build a new `Router` and swap the `Arc`
//! holding it.
//!
//! # Dispatch
//!
//! [`Router::dispatch`] classifies a `(method, path)` pair:
//!
//! | Situation                                         | Result                       |
//! |---------------------------------------------------|------------------------------|
//! | no node matches the path                          | [`Dispatch::NotFound`]        |
//! | a node matches, method unknown or not registered  | [`Dispatch::MethodNotAllowed`] |
//! | a node matches and has a handler for the method   | [`Dispatch::Found`]           |
//!
//! A node reached only as a prefix of longer routes (`/book` when just
//! `/book/:id/info` is registered) is a structural match with no methods, so
//! it yields `MethodNotAllowed` with an empty `allowed` set.

use crate::{
    error::{BoxError, RouteError},
    graph::{RouteGraph, RouteInfo},
    handler::{BoxHandler, Handler},
    method::{Method, MethodSet},
    middleware::{Middleware, Stack},
    params::{ContextPool, Params},
    pool::DEFAULT_MAX_IDLE,
    request::RouteRequest,
};
use std::{fmt, future::Future, sync::Arc};

// ============================================================================
// Builder
// ============================================================================

/// Registers routes and middleware, then freezes them into a [`Router`].
///
/// # Example
///
/// ```rust
/// use chute_core::{Outcome, RouteRequest, Router};
///
/// # futures::executor::block_on(async {
/// let mut builder = Router::builder();
/// builder
///     .get("/book/:id", |req: RouteRequest<()>| async move {
///         Ok(format!("book {}", req.param("id").unwrap_or_default()))
///     })
///     .unwrap();
/// let router = builder.build();
///
/// let outcome = router.handle("GET", "/book/7", ()).await.unwrap();
/// assert_eq!(outcome, Outcome::Handled("book 7".to_string()));
/// # });
/// ```
pub struct RouterBuilder<R, T> {
    graph: RouteGraph<BoxHandler<R, T>>,
    layers: Stack<R, T>,
    pool_max_idle: usize,
    pool_prefill: usize,
}

impl<R, T> RouterBuilder<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create an empty builder with room for `nodes` graph nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            graph: RouteGraph::with_capacity(nodes),
            layers: Stack::new(),
            pool_max_idle: DEFAULT_MAX_IDLE,
            pool_prefill: 0,
        }
    }

    /// Cap the number of idle parameter buffers the router keeps.
    pub fn pool_max_idle(&mut self, max_idle: usize) -> &mut Self {
        self.pool_max_idle = max_idle;
        self
    }

    /// Warm the parameter pool with `count` buffers at build time.
    pub fn pool_prefill(&mut self, count: usize) -> &mut Self {
        self.pool_prefill = count;
        self
    }

    /// Add a middleware layer.
    ///
    /// It wraps every route registered *after* this call, outside any layer
    /// added before it.
    pub fn layer<M: Middleware<R, T>>(&mut self, middleware: M) -> &mut Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Register `handler` for `method` on `path`.
    ///
    /// # Errors
    ///
    /// Any [`RouteError`]. The builder is unchanged when this fails; callers
    /// are expected to treat the error as fatal to startup.
    pub fn route<H: Handler<R, T>>(
        &mut self,
        method: &str,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        let handler = self.layers.apply(BoxHandler::new(handler));
        match self.graph.insert(method, path, handler) {
            Ok(_index) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(method, path, layers = self.layers.len(), "route registered");
                Ok(self)
            }
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(method, path, error = %err, "route rejected");
                Err(err)
            }
        }
    }

    /// Register a `GET` route.
    pub fn get<H: Handler<R, T>>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::Get.as_str(), path, handler)
    }

    /// Register a `POST` route.
    pub fn post<H: Handler<R, T>>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::Post.as_str(), path, handler)
    }

    /// Register a `PUT` route.
    pub fn put<H: Handler<R, T>>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::Put.as_str(), path, handler)
    }

    /// Register a `DELETE` route.
    pub fn delete<H: Handler<R, T>>(
        &mut self,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.route(Method::Delete.as_str(), path, handler)
    }

    /// Register a `HEAD` route.
    pub fn head<H: Handler<R, T>>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouteError> {
        self.route(Method::Head.as_str(), path, handler)
    }

    /// Register an `OPTIONS` route.
    pub fn options<H: Handler<R, T>>(
        &mut self,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.route(Method::Options.as_str(), path, handler)
    }

    /// Register a `PATCH` route.
    pub fn patch<H: Handler<R, T>>(
        &mut self,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouteError> {
        self.route(Method::Patch.as_str(), path, handler)
    }

    /// Routes registered so far.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.graph.routes()
    }

    /// Freeze the routes into a [`Router`].
    pub fn build(self) -> Router<R, T> {
        let pool = ContextPool::with_max_idle(self.pool_max_idle);
        pool.prefill(self.pool_prefill);

        #[cfg(feature = "tracing")]
        {
            let routes = self.graph.routes();
            tracing::info!(
                routes = routes.len(),
                nodes = self.graph.len(),
                "router built"
            );
            for route in &routes {
                tracing::debug!(pattern = %route.pattern, methods = %route.methods, "route");
            }
        }

        Router {
            graph: self.graph,
            pool,
        }
    }
}

impl<R, T> Default for RouterBuilder<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<R, T> fmt::Debug for RouterBuilder<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("nodes", &self.graph.len())
            .field("layers", &self.layers)
            .field("pool_max_idle", &self.pool_max_idle)
            .field("pool_prefill", &self.pool_prefill)
            .finish()
    }
}

// ============================================================================
// Router
// ============================================================================

/// What a request resolved to, after the handler ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The handler ran and produced a response.
    Handled(T),
    /// No route matches the path.
    NotFound,
    /// The path exists but not for this method; carries the allowed set.
    MethodNotAllowed(MethodSet),
}

impl<T> Outcome<T> {
    /// Returns true if a handler produced the response.
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    /// The handler's response, if any.
    pub fn into_handled(self) -> Option<T> {
        match self {
            Outcome::Handled(value) => Some(value),
            _ => None,
        }
    }
}

/// What a `(method, path)` pair resolved to, before any handler ran.
#[derive(Debug)]
pub enum Dispatch<'r, R, T> {
    /// A handler is registered for the method on the matched route.
    Found(Found<'r, R, T>),
    /// No route matches the path.
    NotFound,
    /// The path exists but not for this method.
    MethodNotAllowed {
        /// Methods that are registered on the path; empty when the path
        /// is only a prefix of longer routes.
        allowed: MethodSet,
    },
}

/// A resolved handler plus the parameters captured for it.
///
/// Dropping a `Found` without calling it releases the captured parameters.
pub struct Found<'r, R, T> {
    method: Method,
    route: &'r Arc<str>,
    handler: &'r BoxHandler<R, T>,
    params: Params,
}

impl<'r, R, T> Found<'r, R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    /// The resolved method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Pattern of the matched route.
    pub fn route(&self) -> &str {
        self.route
    }

    /// Captured parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Invoke the handler with `request`.
    ///
    /// The captured parameters move into the [`RouteRequest`] and are
    /// released once the handler's future completes or is dropped.
    pub fn call(self, request: R) -> impl Future<Output = Result<T, BoxError>> + Send + 'r {
        let request = RouteRequest::new(self.method, Arc::clone(self.route), self.params, request);
        self.handler.call(request)
    }
}

impl<R, T> fmt::Debug for Found<'_, R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Found")
            .field("method", &self.method)
            .field("route", self.route)
            .field("params", &self.params)
            .finish()
    }
}

/// A frozen set of routes.
///
/// `Router` is `Send + Sync`; share it behind an `Arc`.
pub struct Router<R, T> {
    graph: RouteGraph<BoxHandler<R, T>>,
    pool: ContextPool,
}

impl<R, T> Router<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    /// Start building a router.
    pub fn builder() -> RouterBuilder<R, T> {
        RouterBuilder::new()
    }

    /// Resolve `method` and `path` to a handler.
    pub fn dispatch(&self, method: &str, path: &str) -> Dispatch<'_, R, T> {
        let Some(found) = self.graph.find(path, &self.pool) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(method, path, "no route");
            return Dispatch::NotFound;
        };

        // An intermediate node carries an empty set and lands in the
        // MethodNotAllowed arm below.
        let (node, params) = found.into_parts();
        let allowed = node.allowed_methods();

        let resolved = method
            .parse::<Method>()
            .ok()
            .and_then(|m| node.handler(m).map(|handler| (m, handler)));
        match resolved {
            Some((method, handler)) => Dispatch::Found(Found {
                method,
                route: node.pattern(),
                handler,
                params,
            }),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!(method, path, %allowed, "method not allowed");
                Dispatch::MethodNotAllowed { allowed }
            }
        }
    }

    /// Resolve and run the handler for `method` and `path`.
    ///
    /// Misses are reported as [`Outcome`] values; only handler failures are
    /// `Err`.
    pub async fn handle(&self, method: &str, path: &str, request: R) -> Result<Outcome<T>, BoxError> {
        match self.dispatch(method, path) {
            Dispatch::Found(found) => found.call(request).await.map(Outcome::Handled),
            Dispatch::NotFound => Ok(Outcome::NotFound),
            Dispatch::MethodNotAllowed { allowed } => Ok(Outcome::MethodNotAllowed(allowed)),
        }
    }

    /// Every registered route.
    pub fn routes(&self) -> Vec<RouteInfo> {
        self.graph.routes()
    }

    /// The parameter pool.
    pub fn pool(&self) -> &ContextPool {
        &self.pool
    }

    /// The frozen route graph.
    pub fn graph(&self) -> &RouteGraph<BoxHandler<R, T>> {
        &self.graph
    }
}

impl<R, T> fmt::Debug for Router<R, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("nodes", &self.graph.len())
            .field("pool", &self.pool)
            .finish()
    }
}
