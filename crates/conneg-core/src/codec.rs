//! Representation codecs
//!
//! A codec is a media type paired with a plain function pointer. The server
//! side keeps encoders (see [`crate::Negotiator`]); the round-trip harness
//! keeps the mirror table of decoders.

use crate::{Error, Result};
use bytes::Bytes;
use conneg_media::MediaType;

/// Serialize a resource into a representation
pub type EncodeFn<R> = fn(&R) -> Result<Bytes>;

/// Deserialize a representation into a resource
pub type DecodeFn<R> = fn(&[u8]) -> Result<R>;

/// JSON codec functions (serde_json)
pub mod json {
    use super::*;
    use serde::de::DeserializeOwned;
    use serde::Serialize;

    /// Encode as `application/json`
    pub fn encode<R: Serialize>(resource: &R) -> Result<Bytes> {
        serde_json::to_vec(resource)
            .map(Bytes::from)
            .map_err(|e| Error::Encode {
                media_type: MediaType::JSON.to_string(),
                message: e.to_string(),
            })
    }

    /// Decode from `application/json`
    pub fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R> {
        serde_json::from_slice(body).map_err(|e| Error::Decode {
            media_type: MediaType::JSON.to_string(),
            message: e.to_string(),
        })
    }
}

/// Decoder table consulted by the round-trip harness
pub struct Decoders<R> {
    entries: Vec<(MediaType, DecodeFn<R>)>,
}

impl<R> Decoders<R> {
    /// Empty table: nothing will ever be decoded
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a decoder, replacing any previous one for the same media type
    pub fn with(mut self, media_type: MediaType, decode: DecodeFn<R>) -> Self {
        self.entries.retain(|(mt, _)| *mt != media_type);
        self.entries.push((media_type, decode));
        self
    }

    /// Decoder for a declared `Content-Type`, if one is registered
    pub fn select(&self, content_type: &MediaType) -> Option<DecodeFn<R>> {
        self.entries
            .iter()
            .find(|(mt, _)| mt == content_type)
            .map(|(_, decode)| *decode)
    }

    /// Registered media types
    pub fn media_types(&self) -> impl Iterator<Item = &MediaType> {
        self.entries.iter().map(|(mt, _)| mt)
    }
}

impl<R: serde::de::DeserializeOwned> Decoders<R> {
    /// Table with only the JSON decoder
    pub fn json() -> Self {
        Self::new().with(MediaType::JSON, json::decode::<R>)
    }
}

impl<R> Default for Decoders<R> {
    fn default() -> Self {
        Self::new()
    }
}
