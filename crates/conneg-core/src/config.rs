//! Host configuration
//!
//! A [`Configuration`] is built explicitly at startup and handed to
//! [`crate::InMemoryHost::new`]; nothing is registered through global state.
//!
//! ```
//! use conneg_core::{Configuration, MyResourceHandler};
//!
//! let config = Configuration::new()
//!     .resource(MyResourceHandler)
//!     .at_uri("/MyResource")
//!     .as_json()
//!     .register()
//!     .unwrap();
//! assert_eq!(config.routes().len(), 1);
//! ```

use crate::codec::EncodeFn;
use crate::middleware::{Middleware, MiddlewareChain, RequestLog, RequestLogConfig};
use crate::routes::{RouteHandler, RouteTable};
use crate::{Method, MyResourceHandler, Negotiator, Request, ResourceHandler, Result};
use conneg_media::MediaType;
use std::sync::Arc;
use tracing::debug;

/// URI the fixture resource is served at
pub const MY_RESOURCE_URI: &str = "/MyResource";

/// Routes and middleware for an [`crate::InMemoryHost`]
#[derive(Default)]
pub struct Configuration {
    pub(crate) routes: RouteTable,
    pub(crate) middleware: MiddlewareChain,
}

impl Configuration {
    /// Empty configuration: no routes, no middleware
    pub fn new() -> Self {
        Self::default()
    }

    /// `MyResource` at `/MyResource`, JSON only, with request logging
    ///
    /// Request ids are neither generated nor echoed, so identical requests
    /// get identical responses.
    pub fn fixture() -> Result<Self> {
        Self::new()
            .request_log(RequestLogConfig::new().generate_id(false).echo_id(false))
            .resource(MyResourceHandler)
            .at_uri(MY_RESOURCE_URI)
            .as_json()
            .register()
    }

    /// Start registering a resource served by `handler`
    pub fn resource<H: ResourceHandler>(self, handler: H) -> PendingResource<H> {
        PendingResource {
            config: self,
            handler,
        }
    }

    /// Add request logging
    pub fn request_log(self, config: RequestLogConfig) -> Self {
        self.middleware(RequestLog::new(config))
    }

    /// Add a middleware; they run in registration order
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.add(middleware);
        self
    }

    /// Registered routes
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }
}

/// A resource waiting for its URI
pub struct PendingResource<H: ResourceHandler> {
    config: Configuration,
    handler: H,
}

impl<H: ResourceHandler> PendingResource<H> {
    /// Serve the resource at `uri`
    pub fn at_uri(self, uri: impl Into<String>) -> ResourceRegistration<H> {
        ResourceRegistration {
            config: self.config,
            handler: self.handler,
            uri: uri.into(),
            negotiator: Negotiator::new(),
        }
    }
}

/// A resource with a URI, collecting its representations
pub struct ResourceRegistration<H: ResourceHandler> {
    config: Configuration,
    handler: H,
    uri: String,
    negotiator: Negotiator<H::Resource>,
}

impl<H> ResourceRegistration<H>
where
    H: ResourceHandler + 'static,
    H::Resource: 'static,
{
    /// Offer a representation
    pub fn codec(mut self, media_type: MediaType, encode: EncodeFn<H::Resource>) -> Self {
        self.negotiator = self.negotiator.with(media_type, encode);
        self
    }

    /// Offer `application/json`
    pub fn as_json(self) -> Self
    where
        H::Resource: serde::Serialize,
    {
        self.codec(MediaType::JSON, crate::codec::json::encode::<H::Resource>)
    }

    /// Add the GET route and return the configuration
    pub fn register(self) -> Result<Configuration> {
        let Self {
            mut config,
            handler,
            uri,
            negotiator,
        } = self;

        debug!(
            uri = %uri,
            representations = ?negotiator.supported().map(|mt| mt.to_string()).collect::<Vec<_>>(),
            "registering resource"
        );

        let route: RouteHandler = Arc::new(move |req: &Request| {
            let resource = handler.get(req);
            negotiator.negotiate(&resource, req.accept().as_ref())
        });
        config.routes.insert(Method::Get, &uri, route)?;
        Ok(config)
    }
}
