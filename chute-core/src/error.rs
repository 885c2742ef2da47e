//! Error types for Chute.
//!
//! Registration failures are reported through [`RouteError`]. They are meant
//! to abort startup: a router that silently dropped a route would misroute
//! traffic later. Request-time misses (no path, wrong method) are ordinary
//! [`Outcome`](crate::Outcome) values and never appear here.
//!
//! Handler failures travel as [`BoxError`].

use crate::method::Method;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while registering a route.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The path pattern is syntactically malformed.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath {
        /// The offending pattern as given by the caller.
        path: String,
        /// What is wrong with it.
        reason: InvalidPathKind,
    },

    /// The method name is not a recognised HTTP verb.
    #[error("no such HTTP method called: {method}")]
    UnknownMethod {
        /// The unrecognised method name.
        method: String,
    },

    /// The same method and path were registered twice.
    #[error("already have a handler for {path} with {method}")]
    DuplicateRoute {
        /// The method registered twice.
        method: Method,
        /// The offending pattern.
        path: String,
    },

    /// A literal and a wildcard segment would become siblings.
    #[error("conflict between {path} and {existing}")]
    TopologyConflict {
        /// The pattern being registered.
        path: String,
        /// The previously registered route prefix it collides with.
        existing: String,
    },
}

impl RouteError {
    pub(crate) fn invalid_path(path: &str, reason: InvalidPathKind) -> Self {
        RouteError::InvalidPath {
            path: path.to_owned(),
            reason,
        }
    }
}

/// Why a path pattern was rejected by the tokenizer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPathKind {
    /// The path is the empty string.
    #[error("path should not be empty")]
    Empty,

    /// The path does not start with `/`.
    #[error("path should start with '/'")]
    MissingLeadingSlash,

    /// Two slashes are adjacent somewhere before the trailing ones.
    #[error("path contains an empty segment")]
    EmptySegment,

    /// A segment contains more than one `:`.
    #[error("segment contains more than one ':'")]
    RepeatedWildcard,

    /// A segment ends with `:`, leaving a parameter without a name.
    #[error("wildcard segment has no parameter name")]
    EmptyParamName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_both_routes() {
        let err = RouteError::TopologyConflict {
            path: "/api/:id".into(),
            existing: "/api/abc".into(),
        };
        assert_eq!(err.to_string(), "conflict between /api/:id and /api/abc");
    }

    #[test]
    fn test_duplicate_message() {
        let err = RouteError::DuplicateRoute {
            method: Method::Get,
            path: "/api/:name".into(),
        };
        assert_eq!(
            err.to_string(),
            "already have a handler for /api/:name with GET"
        );
    }

    #[test]
    fn test_invalid_path_message() {
        let err = RouteError::invalid_path("api", InvalidPathKind::MissingLeadingSlash);
        assert_eq!(
            err.to_string(),
            "invalid path \"api\": path should start with '/'"
        );
    }
}
