//! Request logging middleware
//!
//! Tags each request with an id and emits one `tracing` event per request
//! and per response.

use super::Middleware;
use crate::{Request, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Request log configuration
#[derive(Clone)]
pub struct RequestLogConfig {
    /// Header carrying the request ID
    pub header_name: String,
    /// Generate a request ID if the client sent none
    pub generate_id: bool,
    /// Echo the request ID on the response
    pub echo_id: bool,
}

impl Default for RequestLogConfig {
    fn default() -> Self {
        Self {
            header_name: "X-Request-ID".to_string(),
            generate_id: true,
            echo_id: true,
        }
    }
}

impl RequestLogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header_name(mut self, name: impl Into<String>) -> Self {
        self.header_name = name.into();
        self
    }

    pub fn generate_id(mut self, generate: bool) -> Self {
        self.generate_id = generate;
        self
    }

    pub fn echo_id(mut self, echo: bool) -> Self {
        self.echo_id = echo;
        self
    }
}

/// Request log middleware
pub struct RequestLog {
    config: RequestLogConfig,
    counter: AtomicU64,
}

impl RequestLog {
    pub fn new(config: RequestLogConfig) -> Self {
        Self {
            config,
            counter: AtomicU64::new(0),
        }
    }

    fn next_id(&self) -> String {
        format!("{:016x}", self.counter.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new(RequestLogConfig::default())
    }
}

impl Middleware for RequestLog {
    fn before(&self, req: &mut Request) -> Option<Response> {
        if req.header(&self.config.header_name).is_none() && self.config.generate_id {
            let id = self.next_id();
            req.headers.push((self.config.header_name.clone(), id));
        }

        info!(
            request_id = req.header(&self.config.header_name).unwrap_or("-"),
            method = %req.method,
            path = %req.path,
            accept = req.accept_header().unwrap_or("-"),
            "request"
        );
        None
    }

    fn after(&self, req: &Request, res: &mut Response) {
        let id = req.header(&self.config.header_name);

        info!(
            request_id = id.unwrap_or("-"),
            status = res.status.as_u16(),
            content_type = res.content_type().unwrap_or("-"),
            bytes = res.body.len(),
            "response"
        );

        if let (true, Some(id)) = (self.config.echo_id, id) {
            res.headers.push((self.config.header_name.clone(), id.to_string()));
        }
    }
}
