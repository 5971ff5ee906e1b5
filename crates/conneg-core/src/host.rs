//! In-memory host
//!
//! Runs a request through middleware, route lookup, handler and negotiation
//! without touching the network. The host owns only what the configuration
//! built at startup and never mutates it, so one host can answer any number
//! of requests (from any thread) with identical results.

use crate::middleware::MiddlewareChain;
use crate::routes::{Lookup, RouteTable};
use crate::{Configuration, Request, Response};
use tracing::warn;

/// Processes requests against a fixed [`Configuration`]
pub struct InMemoryHost {
    routes: RouteTable,
    middleware: MiddlewareChain,
}

impl InMemoryHost {
    pub fn new(config: Configuration) -> Self {
        Self {
            routes: config.routes,
            middleware: config.middleware,
        }
    }

    /// Process one request to completion
    pub fn process_request(&self, mut req: Request) -> Response {
        let mut res = match self.middleware.run_before(&mut req) {
            Some(res) => res,
            None => self.dispatch(&req),
        };
        self.middleware.run_after(&req, &mut res);
        res
    }

    fn dispatch(&self, req: &Request) -> Response {
        match self.routes.find(req.method, &req.path) {
            Lookup::Found(handler) => handler(req),
            Lookup::MethodNotAllowed(allowed) => {
                warn!(method = %req.method, path = %req.path, "method not allowed");
                let allow: Vec<&str> = allowed.iter().map(|m| m.as_str()).collect();
                Response::method_not_allowed(&allow.join(", "))
            }
            Lookup::NotFound => {
                warn!(path = %req.path, "no route");
                Response::not_found()
            }
        }
    }
}
