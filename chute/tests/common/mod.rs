#![allow(dead_code)]

use chute::prelude::*;
use std::sync::Arc;

// ============================================================================
// Test Handlers
// ============================================================================

/// Responds with the matched pattern followed by every captured pair.
pub fn describe(req: RouteRequest<()>) -> impl Future<Output = Result<String, BoxError>> + Send {
    let mut out = req.route().to_owned();
    for (name, value) in req.params().iter() {
        out.push_str(&format!(" {name}={value}"));
    }
    async move { Ok(out) }
}

/// Responds with a fixed label.
pub fn label(
    text: &'static str,
) -> impl Fn(RouteRequest<()>) -> std::future::Ready<Result<String, BoxError>> + Send + Sync + 'static
{
    move |_req| std::future::ready(Ok(text.to_owned()))
}

// ============================================================================
// Routers
// ============================================================================

/// The route table used across the matching tests.
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/api"),
    ("GET", "/api/:name"),
    ("POST", "/api"),
    ("GET", "/book"),
    ("GET", "/book/:id/info"),
    ("POST", "/book/:id/info"),
    ("DELETE", "/book/:id"),
];

/// A builder holding [`ROUTES`], each answered by [`describe`].
pub fn library_builder() -> RouterBuilder<(), String> {
    let mut builder = Router::builder();
    for (method, path) in ROUTES {
        builder
            .route(method, path, describe)
            .unwrap_or_else(|err| panic!("{method} {path}: {err}"));
    }
    builder
}

pub fn library() -> Arc<Router<(), String>> {
    Arc::new(library_builder().build())
}

/// Run a request and unwrap the handled body.
pub async fn handled(router: &Router<(), String>, method: &str, path: &str) -> String {
    match router.handle(method, path, ()).await {
        Ok(Outcome::Handled(body)) => body,
        other => panic!("{method} {path}: expected a handled request, got {other:?}"),
    }
}
