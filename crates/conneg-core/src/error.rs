//! Error types for conneg-core

use thiserror::Error;

/// Result type alias for conneg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the conneg host and harness
///
/// An unacceptable `Accept` header is not an error: it is answered with
/// 406 like any other negotiated outcome.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid HTTP method
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Unparseable request URI
    #[error("Invalid URI: {0}")]
    InvalidUri(String),

    /// Two registrations for the same method and path
    #[error("Route already registered: {method} {path}")]
    DuplicateRoute { method: String, path: String },

    /// Serializing a resource failed
    #[error("Failed to encode {media_type}: {message}")]
    Encode { media_type: String, message: String },

    /// Deserializing a response body failed
    #[error("Failed to decode {media_type}: {message}")]
    Decode { media_type: String, message: String },

    /// IO error (native only)
    #[cfg(feature = "native")]
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unusable listen address (native only)
    #[cfg(feature = "native")]
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Hyper error (native only)
    #[cfg(feature = "native")]
    #[error("HTTP error: {0}")]
    Hyper(String),
}
