//! HTTP methods and method bitmasks.

use crate::error::RouteError;
use bitflags::bitflags;
use std::{fmt, str::FromStr};

/// An HTTP method a route can be registered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `PATCH`
    Patch,
    /// `CONNECT`
    Connect,
    /// `TRACE`
    Trace,
}

impl Method {
    /// Number of supported methods.
    pub const COUNT: usize = 9;

    /// Every supported method, in bit order.
    pub const ALL: [Method; Method::COUNT] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Head,
        Method::Options,
        Method::Patch,
        Method::Connect,
        Method::Trace,
    ];

    /// The canonical upper-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
        }
    }

    /// The single bit representing this method.
    pub const fn bit(self) -> MethodSet {
        MethodSet::from_bits_retain(1 << self.index())
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for Method {
    type Err = RouteError;

    /// Parses a canonical method name. Matching is case-sensitive, as HTTP
    /// method tokens are.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RouteError::UnknownMethod {
                method: s.to_owned(),
            })
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// A set of methods, one bit per [`Method`].
    ///
    /// Nodes record the methods they have handlers for as a `MethodSet`, and
    /// `MethodNotAllowed` outcomes report it so a transport can render an
    /// `Allow` header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MethodSet: u16 {
        /// `GET`
        const GET = 1 << 0;
        /// `POST`
        const POST = 1 << 1;
        /// `PUT`
        const PUT = 1 << 2;
        /// `DELETE`
        const DELETE = 1 << 3;
        /// `HEAD`
        const HEAD = 1 << 4;
        /// `OPTIONS`
        const OPTIONS = 1 << 5;
        /// `PATCH`
        const PATCH = 1 << 6;
        /// `CONNECT`
        const CONNECT = 1 << 7;
        /// `TRACE`
        const TRACE = 1 << 8;
    }
}

impl MethodSet {
    /// Returns true if `method`'s bit is set.
    pub fn allows(self, method: Method) -> bool {
        self.contains(method.bit())
    }

    /// Iterates the methods in the set, in bit order.
    pub fn methods(self) -> impl Iterator<Item = Method> {
        Method::ALL.into_iter().filter(move |m| self.allows(*m))
    }
}

impl Default for MethodSet {
    fn default() -> Self {
        MethodSet::empty()
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        method.bit()
    }
}

impl fmt::Display for MethodSet {
    /// Formats as `GET, POST`, the shape of an `Allow` header value.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.methods().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}
