//! conneg-core: In-memory REST resource host with strict content negotiation
//!
//! One resource type is registered at a URI together with the media types it
//! can be represented as. A request whose `Accept` names one of them gets a
//! 200 with the encoded body; anything else gets a bodiless 406.
//!
//! ## Example
//! ```
//! use conneg_core::{Configuration, InMemoryHost, MediaType, MyResource, RoundTrip, StatusCode};
//!
//! let host = InMemoryHost::new(Configuration::fixture().unwrap());
//!
//! let outcome = RoundTrip::<MyResource>::get("http://localhost/MyResource", MediaType::JSON)
//!     .execute(&host)
//!     .unwrap();
//! assert_eq!(outcome.status(), StatusCode::OK);
//! assert_eq!(outcome.resource().unwrap().name, "foobar");
//!
//! let outcome = RoundTrip::<MyResource>::get("http://localhost/MyResource", MediaType::TEXT_PLAIN)
//!     .execute(&host)
//!     .unwrap();
//! assert_eq!(outcome.status(), StatusCode::NOT_ACCEPTABLE);
//! assert!(outcome.resource().is_none());
//! ```
//!
//! ## Features
//! - `native` (default) - serve the host over HTTP/1.1 with tokio/hyper

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod error;
pub mod harness;
pub mod host;
pub mod middleware;
pub mod negotiate;
pub mod request;
pub mod resource;
pub mod response;
pub mod routes;

#[cfg(feature = "native")]
pub mod server;

// Re-exports
pub use codec::{Decoders, DecodeFn, EncodeFn};
pub use config::{Configuration, ResourceRegistration, PendingResource, MY_RESOURCE_URI};
pub use conneg_media::MediaType;
pub use error::{Error, Result};
pub use harness::{Outcome, RoundTrip};
pub use host::InMemoryHost;
pub use negotiate::Negotiator;
pub use request::{Method, Request, RequestBuilder};
pub use resource::{MyResource, MyResourceHandler, ResourceHandler};
pub use response::{Response, ResponseBuilder, StatusCode};
pub use routes::{Lookup, RouteHandler, RouteTable};

// Middleware re-exports
pub use middleware::{Middleware, MiddlewareChain, RequestLog, RequestLogConfig};

#[cfg(feature = "native")]
pub use server::{bind, create_optimized_socket, from_hyper_request, to_hyper_response};

#[cfg(feature = "native")]
pub use server::{ConnectionGuard, ConnectionTracker, Server, ServerConfig};
