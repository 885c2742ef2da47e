//! Request-path lookup.
//!
//! Matching walks the graph from the root, one request segment at a time,
//! without backtracking: a node with a wildcard child always descends into
//! it and captures the segment, otherwise the segment must equal one literal
//! child exactly.

use crate::{
    graph::{Node, ROOT, RouteGraph},
    params::{Context, ContextPool, Params},
    path,
    pool::Pooled,
};
use std::sync::Arc;

/// A structurally matched node plus the parameters captured on the way.
#[derive(Debug)]
pub struct Match<'g, H> {
    node: &'g Node<H>,
    index: usize,
    params: Params,
}

impl<'g, H> Match<'g, H> {
    /// The matched node.
    pub fn node(&self) -> &'g Node<H> {
        self.node
    }

    /// Index of the matched node.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Captured parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Splits the match into its node and parameters.
    pub fn into_parts(self) -> (&'g Node<H>, Params) {
        (self.node, self.params)
    }
}

impl<H> RouteGraph<H> {
    /// Finds the node whose pattern matches `path`.
    ///
    /// Trailing slashes are ignored, so `/api/` matches `/api`. Paths that do
    /// not start with `/` or contain an empty segment never match, not even
    /// through a wildcard.
    ///
    /// A capture buffer is taken from `pool` only once the first wildcard is
    /// crossed; on a miss it is released before returning.
    pub fn find(&self, path: &str, pool: &ContextPool) -> Option<Match<'_, H>> {
        if !path.starts_with('/') {
            return None;
        }

        let mut index = ROOT;
        let mut context: Option<Pooled<Context>> = None;
        for segment in path::trim_trailing(path).split('/').skip(1) {
            if segment.is_empty() {
                return None;
            }
            let node = self.node(index)?;
            let children = self.children(index);
            if node.has_wildcard_child() {
                let child = *children.first()?;
                let name = self.node(child)?.param_name()?;
                context
                    .get_or_insert_with(|| pool.acquire())
                    .push(Arc::clone(name), segment);
                index = child;
            } else {
                index = children
                    .iter()
                    .copied()
                    .find(|&child| self.node(child).is_some_and(|n| n.segment() == segment))?;
            }
        }

        Some(Match {
            node: self.node(index)?,
            index,
            params: Params::from_context(context),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> RouteGraph<&'static str> {
        let mut graph = RouteGraph::new();
        for (method, path) in [
            ("GET", "/"),
            ("GET", "/api"),
            ("POST", "/api"),
            ("GET", "/api/:name"),
            ("GET", "/book"),
            ("GET", "/book/:id/info"),
            ("DELETE", "/book/:id"),
            ("GET", "/files/a:b"),
            ("GET", "/repos/:owner/:repo/issues/:number"),
        ] {
            graph.insert(method, path, path).unwrap();
        }
        graph
    }

    fn pattern(graph: &RouteGraph<&'static str>, pool: &ContextPool, path: &str) -> Option<String> {
        graph
            .find(path, pool)
            .map(|m| m.node().pattern().to_string())
    }

    #[test]
    fn test_literal_and_root_matches() {
        let graph = graph();
        let pool = ContextPool::new();
        assert_eq!(pattern(&graph, &pool, "/").as_deref(), Some("/"));
        assert_eq!(pattern(&graph, &pool, "/api").as_deref(), Some("/api"));
        assert_eq!(pattern(&graph, &pool, "/api/").as_deref(), Some("/api"));
        assert_eq!(pattern(&graph, &pool, "/api///").as_deref(), Some("/api"));
        assert_eq!(pattern(&graph, &pool, "/files/a:b").as_deref(), Some("/files/a:b"));
        assert_eq!(pool.stats().created, 0);
    }

    #[test]
    fn test_wildcard_captures() {
        let graph = graph();
        let pool = ContextPool::new();

        let m = graph.find("/api/%E6%88%91", &pool).unwrap();
        assert_eq!(&**m.node().pattern(), "/api/:name");
        assert_eq!(m.params().get("name"), Some("%E6%88%91"));

        let m = graph.find("/book/42/info", &pool).unwrap();
        assert_eq!(m.params().get("id"), Some("42"));
        assert_eq!(m.node().handler(crate::Method::Get), Some(&"/book/:id/info"));

        let m = graph.find("/repos/rust-lang/rust/issues/1", &pool).unwrap();
        assert_eq!(
            m.params().iter().collect::<Vec<_>>(),
            [("owner", "rust-lang"), ("repo", "rust"), ("number", "1")]
        );
    }

    #[test]
    fn test_wildcard_captures_literal_text() {
        let graph = graph();
        let pool = ContextPool::new();
        let m = graph.find("/api/:name", &pool).unwrap();
        assert_eq!(m.params().get("name"), Some(":name"));
    }

    #[test]
    fn test_misses() {
        let graph = graph();
        let pool = ContextPool::new();
        for path in [
            "",
            "api",
            "/nope",
            "/api/a/b",
            "/api//x",
            "//api",
            "/book/42/summary",
            "/files/a",
        ] {
            assert!(graph.find(path, &pool).is_none(), "{path:?} should miss");
        }
    }

    #[test]
    fn test_intermediate_node_is_structural_match() {
        let graph = graph();
        let pool = ContextPool::new();
        let m = graph.find("/repos/a/b", &pool).unwrap();
        assert!(m.node().allowed_methods().is_empty());
    }

    #[test]
    fn test_miss_after_capture_releases_context() {
        let graph = graph();
        let pool = ContextPool::new();
        assert!(graph.find("/book/42/missing", &pool).is_none());
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.idle(), 1);
    }

    #[test]
    fn test_context_reused_between_lookups() {
        let graph = graph();
        let pool = ContextPool::new();
        for id in 0..10 {
            let path = format!("/book/{id}");
            let m = graph.find(&path, &pool).unwrap();
            assert_eq!(m.params().get("id"), Some(id.to_string().as_str()));
            assert_eq!(m.params().len(), 1);
        }
        let stats = pool.stats();
        assert_eq!(stats.created, 1);
        assert_eq!(stats.reused, 9);
    }
}
