//! HTTP Request types

use crate::{Error, Result};
use conneg_media::MediaType;
use smallvec::SmallVec;

/// HTTP Methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Connect,
    Trace,
}

impl Method {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Connect => "CONNECT",
            Method::Trace => "TRACE",
        }
    }
}

impl std::str::FromStr for Method {
    type Err = Error;

    /// Parse from string (case-insensitive, so `"Get"` works)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "CONNECT" => Ok(Method::Connect),
            "TRACE" => Ok(Method::Trace),
            _ => Err(Error::InvalidMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HTTP Request
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Request path (without query string)
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// Request headers (stack-allocated for small header counts)
    pub headers: SmallVec<[(String, String); 8]>,
    /// Request body
    pub body: bytes::Bytes,
}

impl Request {
    /// Create a new request
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: SmallVec::new(),
            body: bytes::Bytes::new(),
        }
    }

    /// Create a request from a path or an absolute URI
    ///
    /// `http://localhost/MyResource?x=1` keeps only `/MyResource` and `x=1`.
    pub fn from_uri(method: Method, uri: &str) -> Result<Self> {
        let uri: http::Uri = uri
            .parse()
            .map_err(|e: http::uri::InvalidUri| Error::InvalidUri(format!("{}: {}", uri, e)))?;
        let mut request = Self::new(method, uri.path());
        request.query = uri.query().map(|q| q.to_string());
        Ok(request)
    }

    /// Get a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Raw `Accept` header
    pub fn accept_header(&self) -> Option<&str> {
        self.header("accept")
    }

    /// Declared `Accept` media type
    ///
    /// `None` when the header is missing or is not a single valid media type.
    pub fn accept(&self) -> Option<MediaType> {
        self.accept_header()
            .and_then(|v| MediaType::parse(v).ok())
    }
}

/// Builder for constructing requests
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Create a new builder
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            request: Request::new(method, path),
        }
    }

    /// Set query string
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.request.query = Some(query.into());
        self
    }

    /// Add a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.headers.push((name.into(), value.into()));
        self
    }

    /// Set the `Accept` header
    pub fn accept(self, media_type: &MediaType) -> Self {
        self.header("Accept", media_type.to_string())
    }

    /// Set body
    pub fn body(mut self, body: impl Into<bytes::Bytes>) -> Self {
        self.request.body = body.into();
        self
    }

    /// Build the request
    pub fn build(self) -> Request {
        self.request
    }
}

impl From<Request> for RequestBuilder {
    fn from(request: Request) -> Self {
        Self { request }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse() {
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("post".parse::<Method>().unwrap(), Method::Post);
        assert!("INVALID".parse::<Method>().is_err());
    }

    #[test]
    fn test_request_header() {
        let req = RequestBuilder::new(Method::Get, "/")
            .header("Content-Type", "application/json")
            .build();

        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("CONTENT-TYPE"), Some("application/json"));
    }

    #[test]
    fn test_from_absolute_uri() {
        let req = Request::from_uri(Method::Get, "http://localhost/MyResource?x=1").unwrap();
        assert_eq!(req.path, "/MyResource");
        assert_eq!(req.query.as_deref(), Some("x=1"));

        let req = Request::from_uri(Method::Get, "/MyResource").unwrap();
        assert_eq!(req.path, "/MyResource");
        assert_eq!(req.query, None);
    }

    #[test]
    fn test_from_invalid_uri() {
        let err = Request::from_uri(Method::Get, "http://local host/").unwrap_err();
        assert!(matches!(err, Error::InvalidUri(_)));
    }

    #[test]
    fn test_accept() {
        let req = RequestBuilder::new(Method::Get, "/")
            .accept(&MediaType::JSON)
            .build();
        assert_eq!(req.accept_header(), Some("application/json"));
        assert_eq!(req.accept(), Some(MediaType::JSON));

        let req = RequestBuilder::new(Method::Get, "/")
            .header("accept", "application/json, text/plain")
            .build();
        assert_eq!(req.accept(), None);

        let req = Request::new(Method::Get, "/");
        assert_eq!(req.accept(), None);
    }
}
