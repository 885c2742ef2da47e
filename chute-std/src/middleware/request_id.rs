//! Request-id tagging.

use chute_core::{BoxError, BoxHandler, Handler, Middleware, RouteRequest};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Identifier attached to a request as an extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(Arc<str>);

impl RequestId {
    /// The id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the id stamped on `request`, if any.
    pub fn of<R>(request: &RouteRequest<R>) -> Option<&RequestId> {
        request.extensions().get::<RequestId>()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stamps every request with a [`RequestId`] of the form `{prefix}-{n}`.
///
/// `n` starts at 1 and increases by one per request across every route
/// wrapped by this instance (and its clones).
#[derive(Debug, Clone)]
pub struct SetRequestId {
    prefix: Arc<str>,
    counter: Arc<AtomicU64>,
}

impl SetRequestId {
    /// Use `prefix` for every id.
    pub fn new(prefix: impl Into<Arc<str>>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Use this machine's hostname as the prefix, or `localhost` if it is
    /// unknown.
    pub fn hostname() -> Self {
        let host = std::env::var("HOSTNAME")
            .ok()
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| "localhost".to_owned());
        Self::new(host)
    }

    fn next(&self) -> RequestId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        RequestId(Arc::from(format!("{}-{n}", self.prefix)))
    }
}

impl<R, T> Middleware<R, T> for SetRequestId
where
    R: Send + 'static,
    T: Send + 'static,
{
    fn wrap(&self, inner: BoxHandler<R, T>) -> BoxHandler<R, T> {
        BoxHandler::new(RequestIdTagged {
            ids: self.clone(),
            inner,
        })
    }
}

struct RequestIdTagged<R, T> {
    ids: SetRequestId,
    inner: BoxHandler<R, T>,
}

impl<R, T> Handler<R, T> for RequestIdTagged<R, T>
where
    R: Send + 'static,
    T: Send + 'static,
{
    async fn call(&self, mut request: RouteRequest<R>) -> Result<T, BoxError> {
        request.extensions_mut().insert(self.ids.next());
        self.inner.call(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chute_core::{Method, Params};

    #[tokio::test]
    async fn test_ids_increase_per_request() {
        let ids = SetRequestId::new("api");
        let handler = Middleware::<(), String>::wrap(
            &ids,
            BoxHandler::new(|req: RouteRequest<()>| async move {
                Ok(RequestId::of(&req).map(ToString::to_string).unwrap_or_default())
            }),
        );
        let request = || RouteRequest::new(Method::Get, Arc::from("/"), Params::empty(), ());

        assert_eq!(handler.call(request()).await.unwrap(), "api-1");
        assert_eq!(handler.call(request()).await.unwrap(), "api-2");

        // Clones share the counter.
        let again = Middleware::<(), String>::wrap(&ids.clone(), handler.clone());
        assert_eq!(again.call(request()).await.unwrap(), "api-4");
    }

    #[test]
    fn test_hostname_prefix_is_not_empty() {
        let id = SetRequestId::hostname().next();
        assert!(id.as_str().ends_with("-1"));
        assert!(id.as_str().len() > 2);
    }
}
