//! Static route table
//!
//! Built once at startup from a [`crate::Configuration`]; request time is a
//! single hash lookup on `(method, path)`. Paths are compared segment-wise
//! with empty segments dropped, so `/MyResource/` matches `/MyResource`.

use crate::{Error, Method, Request, Response, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Type-erased route handler: request in, negotiated response out
pub type RouteHandler = Arc<dyn Fn(&Request) -> Response + Send + Sync>;

/// Outcome of a route lookup
pub enum Lookup<'a> {
    /// A handler is registered for this method and path
    Found(&'a RouteHandler),
    /// The path exists, but only for these methods
    MethodNotAllowed(Vec<Method>),
    /// Nothing registered at this path
    NotFound,
}

/// (method, path) -> handler
#[derive(Default)]
pub struct RouteTable {
    routes: HashMap<(Method, String), RouteHandler>,
}

impl RouteTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler
    ///
    /// Fails with [`Error::DuplicateRoute`] if the method and path are taken.
    pub fn insert(&mut self, method: Method, path: &str, handler: RouteHandler) -> Result<()> {
        let key = (method, normalize(path));
        if self.routes.contains_key(&key) {
            return Err(Error::DuplicateRoute {
                method: method.to_string(),
                path: key.1,
            });
        }
        self.routes.insert(key, handler);
        Ok(())
    }

    /// Look up the handler for a request line
    pub fn find(&self, method: Method, path: &str) -> Lookup<'_> {
        let path = normalize(path);
        if let Some(handler) = self.routes.get(&(method, path.clone())) {
            return Lookup::Found(handler);
        }

        let allowed = self.allowed_at(&path);
        if allowed.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::MethodNotAllowed(allowed)
        }
    }

    /// Methods registered at a path, sorted by name
    pub fn allowed(&self, path: &str) -> Vec<Method> {
        self.allowed_at(&normalize(path))
    }

    fn allowed_at(&self, normalized: &str) -> Vec<Method> {
        let mut methods: Vec<Method> = self
            .routes
            .keys()
            .filter(|(_, p)| p == normalized)
            .map(|(m, _)| *m)
            .collect();
        methods.sort_by_key(|m| m.as_str());
        methods
    }

    /// Number of registered routes
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no route is registered
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Drop empty segments: `//a/b/` -> `/a/b`
fn normalize(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatusCode;

    fn fixed(status: u16) -> RouteHandler {
        Arc::new(move |_req: &Request| Response::new(StatusCode(status)))
    }

    fn status_of(lookup: Lookup<'_>, req: &Request) -> Option<u16> {
        match lookup {
            Lookup::Found(handler) => Some(handler(req).status.as_u16()),
            _ => None,
        }
    }

    #[test]
    fn test_static_routes() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/", fixed(200)).unwrap();
        table.insert(Method::Get, "/MyResource", fixed(201)).unwrap();
        table.insert(Method::Post, "/MyResource", fixed(202)).unwrap();
        assert_eq!(table.len(), 3);

        let req = Request::new(Method::Get, "/");
        assert_eq!(status_of(table.find(Method::Get, "/"), &req), Some(200));
        assert_eq!(status_of(table.find(Method::Get, "/MyResource"), &req), Some(201));
        assert_eq!(status_of(table.find(Method::Post, "/MyResource"), &req), Some(202));
    }

    #[test]
    fn test_trailing_slash() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/MyResource", fixed(200)).unwrap();

        assert!(matches!(table.find(Method::Get, "/MyResource/"), Lookup::Found(_)));
        assert!(matches!(table.find(Method::Get, "//MyResource"), Lookup::Found(_)));
    }

    #[test]
    fn test_not_found() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/MyResource", fixed(200)).unwrap();

        assert!(matches!(table.find(Method::Get, "/Other"), Lookup::NotFound));
        assert!(matches!(table.find(Method::Get, "/myresource"), Lookup::NotFound));
    }

    #[test]
    fn test_method_not_allowed() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/MyResource", fixed(200)).unwrap();
        table.insert(Method::Delete, "/MyResource", fixed(204)).unwrap();

        match table.find(Method::Put, "/MyResource") {
            Lookup::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, vec![Method::Delete, Method::Get]);
            }
            _ => panic!("expected MethodNotAllowed"),
        }
        assert_eq!(table.allowed("/MyResource/"), vec![Method::Delete, Method::Get]);
        assert!(table.allowed("/Other").is_empty());
    }

    #[test]
    fn test_duplicate_route() {
        let mut table = RouteTable::new();
        table.insert(Method::Get, "/MyResource", fixed(200)).unwrap();

        let err = table.insert(Method::Get, "/MyResource/", fixed(200)).unwrap_err();
        match err {
            Error::DuplicateRoute { method, path } => {
                assert_eq!(method, "GET");
                assert_eq!(path, "/MyResource");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
