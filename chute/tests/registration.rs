//! Route registration: tokenizer rejections, topology conflicts and
//! duplicate detection.

mod common;

use chute::{InvalidPathKind, path};
use chute::prelude::*;
use common::{ROUTES, describe, library_builder};

// ============================================================================
// Valid Registrations
// ============================================================================

#[test]
fn test_register_library() {
    let builder = library_builder();
    let routes = builder.routes();

    let listed: Vec<(String, String)> = routes
        .iter()
        .map(|r| (r.pattern.to_string(), r.methods.to_string()))
        .collect();
    assert_eq!(
        listed,
        [
            ("/api".to_owned(), "GET, POST".to_owned()),
            ("/api/:name".to_owned(), "GET".to_owned()),
            ("/book".to_owned(), "GET".to_owned()),
            ("/book/:id".to_owned(), "DELETE".to_owned()),
            ("/book/:id/info".to_owned(), "GET, POST".to_owned()),
        ]
    );

    let method_count: usize = routes.iter().map(|r| r.methods.methods().count()).sum();
    assert_eq!(method_count, ROUTES.len());
}

#[test]
fn test_same_path_different_methods() {
    let mut builder = Router::<(), String>::builder();
    builder.get("/api/:name", describe).unwrap();
    builder.post("/api/:name", describe).unwrap();
    builder.route("PATCH", "/api/:name/", describe).unwrap();

    let routes = builder.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(
        routes[0].methods,
        MethodSet::GET | MethodSet::POST | MethodSet::PATCH
    );
}

#[test]
fn test_trailing_slash_registers_same_node() {
    let mut builder = Router::<(), String>::builder();
    builder.get("/book/", describe).unwrap();
    let err = builder.get("/book", describe).unwrap_err();
    assert!(matches!(err, RouteError::DuplicateRoute { method: Method::Get, .. }));
}

#[test]
fn test_root_route() {
    let mut builder = Router::<(), String>::builder();
    builder.get("/", describe).unwrap().get("/api", describe).unwrap();
    let patterns: Vec<String> = builder.routes().iter().map(|r| r.pattern.to_string()).collect();
    assert_eq!(patterns, ["/", "/api"]);
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_invalid_paths_rejected() {
    let cases = [
        ("", InvalidPathKind::Empty),
        ("api", InvalidPathKind::MissingLeadingSlash),
        ("//api/abc", InvalidPathKind::EmptySegment),
        ("/api//abc", InvalidPathKind::EmptySegment),
        ("/api/::id", InvalidPathKind::RepeatedWildcard),
        ("/api/:id:name", InvalidPathKind::RepeatedWildcard),
        ("/api/:id:", InvalidPathKind::RepeatedWildcard),
        ("/api/:/a", InvalidPathKind::EmptyParamName),
    ];

    let mut builder = library_builder();
    for (path, kind) in cases {
        let err = builder.get(path, describe).unwrap_err();
        assert_eq!(
            err,
            RouteError::InvalidPath {
                path: path.to_owned(),
                reason: kind
            },
            "{path:?}"
        );
    }
    assert_eq!(builder.routes().len(), 5, "rejections must not touch the graph");
}

#[test]
fn test_topology_conflicts() {
    let cases = [
        ("GET", "/api/:id", "/api/:name"),
        ("POST", "/api/abc", "/api/:name"),
        ("GET", "/book/info", "/book/:id"),
        ("GET", "/book/:ids", "/book/:id"),
    ];

    let mut builder = library_builder();
    for (method, path, existing) in cases {
        let err = builder.route(method, path, describe).unwrap_err();
        assert_eq!(
            err,
            RouteError::TopologyConflict {
                path: path.to_owned(),
                existing: existing.to_owned()
            }
        );
        let message = err.to_string();
        assert!(
            message.starts_with("conflict between ") && message.contains(" and "),
            "{message}"
        );
    }
}

#[test]
fn test_conflict_either_order() {
    let mut literal_first = Router::<(), String>::builder();
    literal_first.post("/api/abc", describe).unwrap();
    assert!(matches!(
        literal_first.get("/api/:id", describe),
        Err(RouteError::TopologyConflict { .. })
    ));

    let mut wildcard_first = Router::<(), String>::builder();
    wildcard_first.get("/api/:id", describe).unwrap();
    assert!(matches!(
        wildcard_first.post("/api/abc", describe),
        Err(RouteError::TopologyConflict { .. })
    ));
}

#[test]
fn test_literal_siblings_coexist() {
    let mut builder = Router::<(), String>::builder();
    builder
        .get("/api/users", describe)
        .unwrap()
        .get("/api/groups", describe)
        .unwrap()
        .get("/api/users/:id", describe)
        .unwrap();
    // Registering the same literal again reuses the node.
    builder.post("/api/users", describe).unwrap();
    assert_eq!(builder.routes().len(), 3);
}

#[test]
fn test_duplicate_route() {
    let mut builder = library_builder();
    let err = builder.get("/api/:name", describe).unwrap_err();
    assert_eq!(
        err,
        RouteError::DuplicateRoute {
            method: Method::Get,
            path: "/api/:name".to_owned()
        }
    );
    assert_eq!(err.to_string(), "already have a handler for /api/:name with GET");
}

#[test]
fn test_unknown_method() {
    let mut builder = library_builder();
    let err = builder.route("GETT", "/api/:name", describe).unwrap_err();
    assert_eq!(err.to_string(), "no such HTTP method called: GETT");

    // Path errors are reported before method errors.
    let err = builder.route("GETT", "api", describe).unwrap_err();
    assert!(matches!(err, RouteError::InvalidPath { .. }));
}

#[test]
fn test_tokenize_round_trip() {
    for pattern in ["/", "/api", "/api/", "/book/:id/info", "/book/:id/info///", "/a/b:c/我"] {
        let first = path::tokenize(pattern).unwrap();
        let rendered = path::render(&first);
        assert_eq!(path::tokenize(&rendered).unwrap(), first, "{pattern}");
    }
}
