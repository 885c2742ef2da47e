//! # Route Graph & Registrar
//!
//! The route graph is a tree of path segments stored as two parallel tables:
//! an append-only node table and an adjacency table mapping each node index
//! to its ordered child indices. Node `0` is the root (the empty segment
//! before the first `/`).
//!
//! # Topology
//!
//! Under any node, children are either
//!
//! - zero or more literal segments with pairwise-distinct text, or
//! - exactly one wildcard segment (`:name`).
//!
//! Never both. [`RouteGraph::insert`] rejects any registration that would
//! break this, which is what lets the matcher walk forward without ever
//! backtracking.
//!
//! # Example
//!
//! ```rust
//! use chute_core::graph::RouteGraph;
//! use chute_core::{MethodSet, RouteError};
//!
//! let mut graph = RouteGraph::new();
//! graph.insert("GET", "/book/:id", "show").unwrap();
//! graph.insert("DELETE", "/book/:id", "remove").unwrap();
//!
//! let err = graph.insert("GET", "/book/latest", "latest").unwrap_err();
//! assert!(matches!(err, RouteError::TopologyConflict { .. }));
//!
//! let routes = graph.routes();
//! assert_eq!(&*routes[0].pattern, "/book/:id");
//! assert_eq!(routes[0].methods, MethodSet::GET | MethodSet::DELETE);
//! ```

use crate::{
    error::RouteError,
    method::{Method, MethodSet},
    path::{self, is_wildcard},
};
use std::sync::Arc;

/// Index of the root node.
pub const ROOT: usize = 0;

/// One path segment position in the graph.
#[derive(Debug)]
pub struct Node<H> {
    segment: Box<str>,
    param: Option<Arc<str>>,
    wildcard_child: bool,
    depth: usize,
    allowed: MethodSet,
    handlers: [Option<H>; Method::COUNT],
    pattern: Arc<str>,
}

impl<H> Node<H> {
    fn root() -> Self {
        Self {
            segment: Box::from(""),
            param: None,
            wildcard_child: false,
            depth: 0,
            allowed: MethodSet::empty(),
            handlers: std::array::from_fn(|_| None),
            pattern: Arc::from("/"),
        }
    }

    fn child_of(parent: &Node<H>, segment: &str) -> Self {
        let param = segment
            .strip_prefix(path::WILDCARD)
            .map(Arc::<str>::from);
        let pattern = match parent.depth {
            0 => format!("/{segment}"),
            _ => format!("{}/{segment}", parent.pattern),
        };
        Self {
            segment: Box::from(segment),
            param,
            wildcard_child: false,
            depth: parent.depth + 1,
            allowed: MethodSet::empty(),
            handlers: std::array::from_fn(|_| None),
            pattern: Arc::from(pattern),
        }
    }

    /// Literal text, or the verbatim wildcard text (`:name`).
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns true if this node captures a value instead of matching text.
    pub fn is_wildcard(&self) -> bool {
        self.param.is_some()
    }

    /// Parameter name captured by a wildcard node.
    pub fn param_name(&self) -> Option<&Arc<str>> {
        self.param.as_ref()
    }

    /// Returns true if this node's only child is a wildcard.
    pub fn has_wildcard_child(&self) -> bool {
        self.wildcard_child
    }

    /// Distance from the root.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Methods with a handler registered at exactly this node.
    pub fn allowed_methods(&self) -> MethodSet {
        self.allowed
    }

    /// Handler registered for `method`, if any.
    pub fn handler(&self, method: Method) -> Option<&H> {
        self.handlers[method.index()].as_ref()
    }

    /// Normalized route pattern ending at this node, e.g. `/book/:id`.
    pub fn pattern(&self) -> &Arc<str> {
        &self.pattern
    }
}

/// A registered route as listed by [`RouteGraph::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInfo {
    /// Normalized pattern.
    pub pattern: Arc<str>,
    /// Methods registered for it.
    pub methods: MethodSet,
}

/// Node table plus adjacency table.
///
/// Mutated only through [`insert`](Self::insert) during the build phase;
/// lookups take `&self` and are safe to run concurrently once building is
/// over.
#[derive(Debug)]
pub struct RouteGraph<H> {
    nodes: Vec<Node<H>>,
    children: Vec<Vec<usize>>,
}

impl<H> Default for RouteGraph<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RouteGraph<H> {
    /// Create a graph holding only the root.
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create a graph with room for `nodes` nodes before reallocating.
    pub fn with_capacity(nodes: usize) -> Self {
        let mut graph = Self {
            nodes: Vec::with_capacity(nodes.max(1)),
            children: Vec::with_capacity(nodes.max(1)),
        };
        graph.nodes.push(Node::root());
        graph.children.push(Vec::new());
        graph
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// The root node.
    pub fn root(&self) -> &Node<H> {
        &self.nodes[ROOT]
    }

    /// Node at `index`.
    pub fn node(&self, index: usize) -> Option<&Node<H>> {
        self.nodes.get(index)
    }

    /// Child indices of the node at `index`, in insertion order.
    pub fn children(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Register `handler` for `method` on the path pattern `path`.
    ///
    /// Returns the index of the terminal node. On error the graph is left
    /// exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`RouteError::InvalidPath`] if the pattern is malformed;
    /// - [`RouteError::UnknownMethod`] if `method` is not an HTTP verb;
    /// - [`RouteError::DuplicateRoute`] if `method` is already registered on
    ///   this exact pattern;
    /// - [`RouteError::TopologyConflict`] if the pattern would place a
    ///   wildcard and a literal (or two differently named wildcards) under
    ///   the same parent.
    pub fn insert(&mut self, method: &str, path: &str, handler: H) -> Result<usize, RouteError> {
        let segments = path::tokenize(path)?;
        let reached = self.walk(&segments);
        let method: Method = method.parse()?;

        let last = segments.len() - 1;
        let depth = self.nodes[reached].depth;
        if depth == last && self.nodes[reached].allowed.allows(method) {
            return Err(RouteError::DuplicateRoute {
                method,
                path: path.to_owned(),
            });
        }

        let mut terminal = reached;
        if depth < last {
            let next = depth + 1;
            if let Some(&sibling) = self.children[reached].first() {
                if self.nodes[reached].wildcard_child || is_wildcard(segments[next]) {
                    return Err(RouteError::TopologyConflict {
                        path: path.to_owned(),
                        existing: self.nodes[sibling].pattern.to_string(),
                    });
                }
            }
            terminal = self.grow(reached, &segments[next..]);
        }

        let node = &mut self.nodes[terminal];
        node.allowed |= method.bit();
        node.handlers[method.index()] = Some(handler);
        Ok(terminal)
    }

    /// Follows children whose segment text equals the input verbatim and
    /// returns the deepest node reached. Wildcards are never substituted
    /// here: `:id` is only reused by another `:id`.
    fn walk(&self, segments: &[&str]) -> usize {
        let mut index = ROOT;
        for segment in &segments[1..] {
            let next = self.children[index]
                .iter()
                .copied()
                .find(|&child| &*self.nodes[child].segment == *segment);
            match next {
                Some(child) => index = child,
                None => break,
            }
        }
        index
    }

    /// Appends one node per segment, chained from `from`, and returns the
    /// last one.
    fn grow(&mut self, mut from: usize, segments: &[&str]) -> usize {
        for segment in segments {
            let node = Node::child_of(&self.nodes[from], segment);
            let index = self.nodes.len();
            self.nodes[from].wildcard_child = node.is_wildcard();
            self.nodes.push(node);
            self.children.push(Vec::new());
            self.children[from].push(index);
            from = index;
        }
        from
    }

    /// Every node with at least one handler, depth first in insertion
    /// order.
    pub fn routes(&self) -> Vec<RouteInfo> {
        let mut routes = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(index) = stack.pop() {
            let node = &self.nodes[index];
            if !node.allowed.is_empty() {
                routes.push(RouteInfo {
                    pattern: Arc::clone(&node.pattern),
                    methods: node.allowed,
                });
            }
            stack.extend(self.children[index].iter().rev());
        }
        routes
    }
}
