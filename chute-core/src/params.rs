//! Captured path parameters.
//!
//! A [`Context`] is the pooled capture buffer the matcher writes into; a
//! [`Params`] is what handlers see. `Params` owns the pooled context, so the
//! buffer goes back to the pool exactly when the request that captured it is
//! dropped.

use crate::pool::{Pool, Pooled, Reset};
use std::sync::Arc;

/// Pool of capture buffers shared by every request of a router.
pub type ContextPool = Pool<Context>;

/// Parameter names and values captured while matching one request.
///
/// Names and values are index-aligned and in left-to-right path order.
/// Names are shared with the route graph; values are packed into a single
/// string buffer so a recycled context captures without allocating.
#[derive(Debug, Default)]
pub struct Context {
    names: Vec<Arc<str>>,
    values: String,
    ends: Vec<usize>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a captured `name = value` pair.
    pub fn push(&mut self, name: Arc<str>, value: &str) {
        self.values.push_str(value);
        self.ends.push(self.values.len());
        self.names.push(name);
    }

    /// Value captured for `name`, by linear scan in capture order.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.names
            .iter()
            .position(|n| &**n == name)
            .map(|i| self.value_at(i))
    }

    /// Iterate `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (&**name, self.value_at(i)))
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn value_at(&self, index: usize) -> &str {
        let start = match index {
            0 => 0,
            i => self.ends[i - 1],
        };
        self.values.get(start..self.ends[index]).unwrap_or_default()
    }
}

impl Reset for Context {
    fn reset(&mut self) {
        self.names.clear();
        self.values.clear();
        self.ends.clear();
    }
}

/// Path parameters of a matched request.
///
/// Empty when the route has no wildcard segments, in which case no pooled
/// buffer was ever taken.
#[derive(Debug, Default)]
pub struct Params {
    context: Option<Pooled<Context>>,
}

impl Params {
    /// Parameters with no captures.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_context(context: Option<Pooled<Context>>) -> Self {
        Self { context }
    }

    /// Value captured for `name`.
    ///
    /// ```rust
    /// use chute_core::{Dispatch, RouteRequest, Router};
    ///
    /// let mut builder = Router::<(), ()>::builder();
    /// builder
    ///     .get("/book/:id", |_req: RouteRequest<()>| async { Ok(()) })
    ///     .unwrap();
    /// let router = builder.build();
    ///
    /// let Dispatch::Found(found) = router.dispatch("GET", "/book/42") else {
    ///     panic!("expected a match");
    /// };
    /// assert_eq!(found.params().get("id"), Some("42"));
    /// assert_eq!(found.params().get("name"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.context.as_deref().and_then(|ctx| ctx.get(name))
    }

    /// Iterate `(name, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.context.as_deref().into_iter().flat_map(|ctx| ctx.iter())
    }

    /// Number of captured parameters.
    pub fn len(&self) -> usize {
        self.context.as_deref().map_or(0, Context::len)
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if this request holds a pooled buffer.
    pub fn is_pooled(&self) -> bool {
        self.context.is_some()
    }
}
