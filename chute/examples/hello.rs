//! Builds a small router, layers the standard middleware onto it and
//! replays a handful of requests.
//!
//! ```text
//! RUST_LOG=chute=debug,hello=info cargo run --example hello --features timeout,validate
//! ```

use chute::middleware::{BurstLimit, SetRequestId, Timeout, Trace};
use chute::prelude::*;
use chute::validate::{Rules, Validate, ValidationError, Validator};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Signup {
    name: String,
    email: String,
}

impl Signup {
    /// Parses `name,email`.
    fn parse(body: &str) -> Option<Self> {
        let (name, email) = body.split_once(',')?;
        Some(Self {
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
        })
    }
}

impl Validate for Signup {
    fn validate(&self, v: &mut Validator<'_>) -> Result<(), ValidationError> {
        v.field("name", &self.name, "word")?
            .field("email", &self.email, "email")?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chute=debug,hello=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rules = Arc::new(Rules::standard()?);

    let mut builder = Router::<String, String>::builder();
    builder
        .layer(Timeout::new(Duration::from_secs(2)))
        .layer(BurstLimit::new(16, Duration::from_millis(100)))
        .layer(SetRequestId::hostname())
        .layer(Trace::new());

    builder
        .get("/hello/:name", |req: RouteRequest<String>| async move {
            Ok(format!("hello, {}", req.param("name").unwrap_or("stranger")))
        })?
        .get("/book/:id/info", |req: RouteRequest<String>| async move {
            Ok(format!("book {} is on the shelf", req.param("id").unwrap_or_default()))
        })?
        .delete("/book/:id", |req: RouteRequest<String>| async move {
            Ok(format!("book {} removed", req.param("id").unwrap_or_default()))
        })?
        .post("/signup", move |req: RouteRequest<String>| {
            let rules = Arc::clone(&rules);
            async move {
                let signup = Signup::parse(req.inner()).ok_or("expected `name,email`")?;
                rules.validate(&signup)?;
                Ok::<_, BoxError>(format!("welcome, {}", signup.name))
            }
        })?
        .get("/slow", |_req: RouteRequest<String>| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("never".to_owned())
        })?;

    for route in builder.routes() {
        tracing::info!(pattern = %route.pattern, methods = %route.methods, "registered");
    }

    // Conflicting registrations are refused up front.
    if let Err(err) = builder.get("/book/info", |_req: RouteRequest<String>| async {
        Ok(String::new())
    }) {
        tracing::info!(%err, "rejected");
    }

    let router = builder.build();

    let requests = [
        ("GET", "/hello/ferris", ""),
        ("GET", "/hello/ferris/", ""),
        ("GET", "/book/42/info", ""),
        ("DELETE", "/book/42", ""),
        ("PUT", "/book/42", ""),
        ("GET", "/nowhere", ""),
        ("POST", "/signup", "ada, ada@example.com"),
        ("POST", "/signup", "ada, not-an-email"),
        ("GET", "/slow", ""),
    ];
    for (method, path, body) in requests {
        match router.handle(method, path, body.to_owned()).await {
            Ok(Outcome::Handled(reply)) => tracing::info!(method, path, %reply, "200"),
            Ok(Outcome::NotFound) => tracing::info!(method, path, "404"),
            Ok(Outcome::MethodNotAllowed(allowed)) => {
                tracing::info!(method, path, allow = %allowed, "405")
            }
            Err(err) => tracing::info!(method, path, %err, "500"),
        }
    }

    Ok(())
}
