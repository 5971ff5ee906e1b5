//! Content negotiation
//!
//! Strict two-outcome negotiation: the request's `Accept` media type must
//! equal (by essence) one of the registered encoders, otherwise the answer
//! is 406 with an empty body. No wildcards and no lists. Weights are not
//! ranked, but an explicit `q=0` is a refusal and never matches.

use crate::codec::{self, EncodeFn};
use crate::Response;
use conneg_media::MediaType;
use tracing::{debug, warn};

/// Media type -> encoder table for one resource type
pub struct Negotiator<R> {
    encoders: Vec<(MediaType, EncodeFn<R>)>,
}

impl<R> Negotiator<R> {
    /// Empty table: every request is answered with 406
    pub fn new() -> Self {
        Self {
            encoders: Vec::new(),
        }
    }

    /// Register an encoder, replacing any previous one for the same media type
    pub fn with(mut self, media_type: MediaType, encode: EncodeFn<R>) -> Self {
        self.encoders.retain(|(mt, _)| *mt != media_type);
        self.encoders.push((media_type, encode));
        self
    }

    /// Media types this negotiator can produce
    pub fn supported(&self) -> impl Iterator<Item = &MediaType> {
        self.encoders.iter().map(|(mt, _)| mt)
    }

    /// Pick the encoder for a declared `Accept` media type
    pub fn select(&self, accept: Option<&MediaType>) -> Option<(&MediaType, EncodeFn<R>)> {
        let accept = accept.filter(|mt| !refused(mt))?;
        self.encoders
            .iter()
            .find(|(mt, _)| mt == accept)
            .map(|(mt, encode)| (mt, *encode))
    }

    /// Produce the response for `resource`
    ///
    /// 200 with the encoded body and `Content-Type` on a match, 406 with no
    /// body otherwise. An encoder failure is answered with a bodiless 500.
    pub fn negotiate(&self, resource: &R, accept: Option<&MediaType>) -> Response {
        let Some((media_type, encode)) = self.select(accept) else {
            let declared = accept.map_or_else(|| "-".to_string(), ToString::to_string);
            warn!(accept = %declared, "no acceptable representation");
            return Response::not_acceptable();
        };

        match encode(resource) {
            Ok(body) => {
                debug!(content_type = %media_type, bytes = body.len(), "representation selected");
                Response::representation(media_type, body)
            }
            Err(e) => {
                warn!(error = %e, "encoding failed");
                Response::internal_error()
            }
        }
    }
}

/// `q=0` (any spelling of zero) marks a media type as not acceptable
fn refused(media_type: &MediaType) -> bool {
    media_type
        .param("q")
        .and_then(|q| q.trim().parse::<f32>().ok())
        .map_or(false, |q| q == 0.0)
}

impl<R: serde::Serialize> Negotiator<R> {
    /// Table with only the JSON encoder
    pub fn json() -> Self {
        Self::new().with(MediaType::JSON, codec::json::encode::<R>)
    }
}

impl<R> Default for Negotiator<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result, StatusCode};
    use bytes::Bytes;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Named {
        #[serde(rename = "Name")]
        name: String,
    }

    fn named() -> Named {
        Named {
            name: "foobar".to_string(),
        }
    }

    #[test]
    fn test_json_accepted() {
        let res = Negotiator::json().negotiate(&named(), Some(&MediaType::JSON));
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.content_type(), Some("application/json"));
        assert_eq!(&res.body[..], br#"{"Name":"foobar"}"#);
    }

    #[test]
    fn test_json_with_params_accepted() {
        let accept = MediaType::parse("application/json; charset=utf-8").unwrap();
        let res = Negotiator::json().negotiate(&named(), Some(&accept));
        assert_eq!(res.status, StatusCode::OK);
    }

    #[test]
    fn test_zero_weight_rejected() {
        let negotiator = Negotiator::json();
        for accept in ["application/json;q=0", "application/json; q=0.000", "application/json;Q=0.0"] {
            let accept = MediaType::parse(accept).unwrap();
            let res = negotiator.negotiate(&named(), Some(&accept));
            assert_eq!(res.status, StatusCode::NOT_ACCEPTABLE, "accept = {}", accept);
            assert!(res.body.is_empty());
        }

        let accept = MediaType::parse("application/json;q=0.5").unwrap();
        assert_eq!(negotiator.negotiate(&named(), Some(&accept)).status, StatusCode::OK);
    }

    #[test]
    fn test_unsupported_rejected() {
        let negotiator = Negotiator::json();
        let candidates = [
            Some(MediaType::TEXT_PLAIN),
            Some(MediaType::XML),
            Some(MediaType::HTML),
            Some(MediaType::ANY),
            Some(MediaType::parse("application/*").unwrap()),
            Some(MediaType::parse("application/vnd.api+json").unwrap()),
            None,
        ];

        for accept in candidates {
            let res = negotiator.negotiate(&named(), accept.as_ref());
            assert_eq!(res.status, StatusCode::NOT_ACCEPTABLE, "accept = {:?}", accept);
            assert!(res.body.is_empty());
            assert_eq!(res.content_type(), None);
        }
    }

    #[test]
    fn test_empty_table_rejects_everything() {
        let res = Negotiator::<Named>::new().negotiate(&named(), Some(&MediaType::JSON));
        assert_eq!(res.status, StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn test_encoder_failure() {
        fn broken(_: &Named) -> Result<Bytes> {
            Err(Error::Encode {
                media_type: "application/json".to_string(),
                message: "boom".to_string(),
            })
        }

        let res = Negotiator::<Named>::new()
            .with(MediaType::JSON, broken)
            .negotiate(&named(), Some(&MediaType::JSON));
        assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(res.body.is_empty());
    }

    #[test]
    fn test_supported() {
        let negotiator = Negotiator::<Named>::json();
        let supported: Vec<_> = negotiator.supported().collect();
        assert_eq!(supported, vec![&MediaType::JSON]);
    }
}
