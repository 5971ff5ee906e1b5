//! Round-trip harness
//!
//! Drives one request through an [`InMemoryHost`] and decodes the answer:
//!
//! 1. Build the request from method, URI and `Accept`
//! 2. Let the host process it
//! 3. Decode the body only if the response declares a `Content-Type` for
//!    which a decoder is registered; otherwise the resource stays absent
//!
//! Status assertions are therefore always meaningful, resource assertions
//! only when the status is 200 and a decoder matched.

use crate::codec::Decoders;
use crate::{InMemoryHost, MediaType, Method, Request, RequestBuilder, Response, Result, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

/// A named predicate over an [`Outcome`]
pub struct Expectation<R> {
    pub name: String,
    check: Box<dyn Fn(&Outcome<R>) -> bool + Send + Sync>,
}

/// One request plus its decoding rules and expectations
pub struct RoundTrip<R> {
    /// Method as written by the caller (`"Get"`, `"GET"`, ...)
    pub method: String,
    /// Path or absolute URI
    pub uri: String,
    /// Media type sent in `Accept`
    pub accept: MediaType,
    decoders: Decoders<R>,
    expectations: Vec<Expectation<R>>,
}

impl<R: DeserializeOwned> RoundTrip<R> {
    /// GET `uri` with the JSON decoder registered
    pub fn get(uri: impl Into<String>, accept: MediaType) -> Self {
        Self::new("GET", uri, accept, Decoders::json())
    }
}

impl<R> RoundTrip<R> {
    pub fn new(
        method: impl Into<String>,
        uri: impl Into<String>,
        accept: MediaType,
        decoders: Decoders<R>,
    ) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            accept,
            decoders,
            expectations: Vec::new(),
        }
    }

    /// Add a named expectation, checked by [`RoundTrip::verify`]
    pub fn expect(
        mut self,
        name: impl Into<String>,
        check: impl Fn(&Outcome<R>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.expectations.push(Expectation {
            name: name.into(),
            check: Box::new(check),
        });
        self
    }

    /// The request this round trip sends
    pub fn request(&self) -> Result<Request> {
        let method: Method = self.method.parse()?;
        let request = Request::from_uri(method, &self.uri)?;
        Ok(RequestBuilder::from(request).accept(&self.accept).build())
    }

    /// Send the request and decode the response
    pub fn execute(&self, host: &InMemoryHost) -> Result<Outcome<R>> {
        let response = host.process_request(self.request()?);
        self.decode(response)
    }

    /// Apply the decoding policy to a response
    pub fn decode(&self, response: Response) -> Result<Outcome<R>> {
        let decoder = response
            .content_type()
            .and_then(|ct| MediaType::parse(ct).ok())
            .and_then(|ct| self.decoders.select(&ct));

        let resource = match decoder {
            Some(decode) => Some(decode(&response.body)?),
            None => {
                debug!(
                    status = response.status.as_u16(),
                    content_type = response.content_type().unwrap_or("-"),
                    "response left undecoded"
                );
                None
            }
        };

        Ok(Outcome { resource, response })
    }

    /// Execute and return the names of failed expectations
    pub fn verify(&self, host: &InMemoryHost) -> Result<Vec<String>> {
        let outcome = self.execute(host)?;
        Ok(self
            .expectations
            .iter()
            .filter(|e| !(e.check)(&outcome))
            .map(|e| e.name.clone())
            .collect())
    }
}

/// Status, raw response and decoded resource of one round trip
#[derive(Debug, Clone)]
pub struct Outcome<R> {
    resource: Option<R>,
    response: Response,
}

impl<R> Outcome<R> {
    /// Decoded resource, if a decoder matched
    pub fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    /// Take the decoded resource
    pub fn into_resource(self) -> Option<R> {
        self.resource
    }

    pub fn status(&self) -> StatusCode {
        self.response.status
    }

    pub fn response(&self) -> &Response {
        &self.response
    }
}
