//! # Segment Tokenizer
//!
//! Splits a path pattern into `/`-delimited segments and rejects malformed
//! syntax before anything touches the route graph.
//!
//! Grammar, after trailing slashes are stripped:
//!
//! - the path starts with `/`;
//! - every segment after the root is non-empty;
//! - a segment holds at most one `:` and does not end with it;
//! - a segment starting with `:` is a wildcard named by the rest of it.
//!
//! The output always starts with the empty root segment:
//!
//! ```rust
//! use chute_core::path::tokenize;
//!
//! assert_eq!(tokenize("/book/:id/").unwrap(), ["", "book", ":id"]);
//! assert_eq!(tokenize("/").unwrap(), [""]);
//! assert!(tokenize("/api//abc").is_err());
//! ```

use crate::error::{InvalidPathKind, RouteError};

/// Marks a wildcard segment.
pub const WILDCARD: char = ':';

/// Returns true if `segment` captures a value instead of matching literally.
pub fn is_wildcard(segment: &str) -> bool {
    segment.starts_with(WILDCARD)
}

/// Tokenizes a path pattern into its segments.
pub fn tokenize(path: &str) -> Result<Vec<&str>, RouteError> {
    if path.is_empty() {
        return Err(RouteError::invalid_path(path, InvalidPathKind::Empty));
    }
    if !path.starts_with('/') {
        return Err(RouteError::invalid_path(
            path,
            InvalidPathKind::MissingLeadingSlash,
        ));
    }

    let segments: Vec<&str> = trim_trailing(path).split('/').collect();
    for segment in &segments[1..] {
        if let Some(kind) = check_segment(segment) {
            return Err(RouteError::invalid_path(path, kind));
        }
    }
    Ok(segments)
}

/// Joins segments back into a path; the bare root renders as `/`.
pub fn render(segments: &[&str]) -> String {
    if segments.len() <= 1 {
        return "/".to_owned();
    }
    segments.join("/")
}

/// Strips trailing slashes, so `/` becomes the empty string.
pub(crate) fn trim_trailing(path: &str) -> &str {
    path.trim_end_matches('/')
}

fn check_segment(segment: &str) -> Option<InvalidPathKind> {
    if segment.is_empty() {
        Some(InvalidPathKind::EmptySegment)
    } else if segment.matches(WILDCARD).count() > 1 {
        Some(InvalidPathKind::RepeatedWildcard)
    } else if segment.ends_with(WILDCARD) {
        Some(InvalidPathKind::EmptyParamName)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        let cases: [(&str, &[&str]); 7] = [
            ("/api/", &["", "api"]),
            ("/api/////", &["", "api"]),
            ("/", &[""]),
            ("/book", &["", "book"]),
            ("/book/", &["", "book"]),
            ("/book/我", &["", "book", "我"]),
            ("/book/:id/info", &["", "book", ":id", "info"]),
        ];
        for (path, want) in cases {
            assert_eq!(tokenize(path).unwrap(), want, "tokenize({path:?})");
        }
    }

    #[test]
    fn test_invalid_paths() {
        let cases = [
            ("", InvalidPathKind::Empty),
            ("api", InvalidPathKind::MissingLeadingSlash),
            ("//api/abc", InvalidPathKind::EmptySegment),
            ("/api//abc", InvalidPathKind::EmptySegment),
            ("/api/::id", InvalidPathKind::RepeatedWildcard),
            ("/api/:id:name", InvalidPathKind::RepeatedWildcard),
            ("/api/:id:", InvalidPathKind::RepeatedWildcard),
            ("/api/:/a", InvalidPathKind::EmptyParamName),
            ("/api/:", InvalidPathKind::EmptyParamName),
            ("/api/abc:", InvalidPathKind::EmptyParamName),
        ];
        for (path, kind) in cases {
            match tokenize(path) {
                Err(RouteError::InvalidPath { path: p, reason }) => {
                    assert_eq!(p, path);
                    assert_eq!(reason, kind, "tokenize({path:?})");
                }
                other => panic!("tokenize({path:?}) = {other:?}, want InvalidPath"),
            }
        }
    }

    #[test]
    fn test_inner_colon_is_literal() {
        let segments = tokenize("/files/a:b").unwrap();
        assert_eq!(segments, ["", "files", "a:b"]);
        assert!(!is_wildcard(segments[2]));
    }

    #[test]
    fn test_wildcard_detection() {
        assert!(is_wildcard(":id"));
        assert!(!is_wildcard("id"));
        assert!(!is_wildcard(""));
    }

    #[test]
    fn test_render_round_trip() {
        for path in ["/", "/api", "/api/", "/book/:id/info//", "/files/a:b"] {
            let segments = tokenize(path).unwrap();
            let rendered = render(&segments);
            assert_eq!(tokenize(&rendered).unwrap(), segments, "{path:?}");
        }
        assert_eq!(render(&[""]), "/");
        assert_eq!(render(&["", "book", ":id"]), "/book/:id");
    }
}
