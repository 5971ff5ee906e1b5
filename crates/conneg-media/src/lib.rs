//! conneg-media: Zero-dependency media type identifiers
//!
//! Single Source of Truth (SSOT) for media types used by both the server-side
//! negotiator and the client-side decoder in conneg-core.
//!
//! ## Features
//! - Parses `type/subtype` with optional `; name=value` parameters
//! - Equality compares the essence (`type/subtype`) case-insensitively
//! - Parameters are kept for display but never affect equality
//! - Zero external dependencies
//!
//! ## Example
//! ```
//! use conneg_media::MediaType;
//!
//! let declared: MediaType = "Application/JSON; charset=utf-8".parse().unwrap();
//! assert_eq!(declared, MediaType::JSON);
//! assert_eq!(declared.param("charset"), Some("utf-8"));
//! assert_ne!(declared, MediaType::TEXT_PLAIN);
//! ```

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Media type parse failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Input was empty or whitespace
    Empty,
    /// Missing or malformed `type/subtype`
    InvalidEssence(String),
    /// Malformed `name=value` parameter
    InvalidParameter(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty media type"),
            ParseError::InvalidEssence(s) => write!(f, "invalid media type essence: {}", s),
            ParseError::InvalidParameter(s) => write!(f, "invalid media type parameter: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// A media type such as `application/json; charset=utf-8`
#[derive(Debug, Clone)]
pub struct MediaType {
    /// Lowercase `type/subtype`
    essence: Cow<'static, str>,
    /// Parameters in declaration order, names lowercased
    params: Vec<(String, String)>,
}

impl MediaType {
    /// `application/json`
    pub const JSON: MediaType = MediaType::from_static("application/json");
    /// `text/plain`
    pub const TEXT_PLAIN: MediaType = MediaType::from_static("text/plain");
    /// `application/xml`
    pub const XML: MediaType = MediaType::from_static("application/xml");
    /// `text/html`
    pub const HTML: MediaType = MediaType::from_static("text/html");
    /// `*/*`
    pub const ANY: MediaType = MediaType::from_static("*/*");

    /// Build from a lowercase, already valid essence
    const fn from_static(essence: &'static str) -> Self {
        Self {
            essence: Cow::Borrowed(essence),
            params: Vec::new(),
        }
    }

    /// Parse a media type
    ///
    /// # Example
    /// ```
    /// use conneg_media::MediaType;
    ///
    /// let mt = MediaType::parse("text/plain").unwrap();
    /// assert_eq!(mt.type_(), "text");
    /// assert_eq!(mt.subtype(), "plain");
    /// assert!(MediaType::parse("application/json, text/plain").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut parts = input.split(';');
        let essence = parts.next().unwrap_or_default().trim();
        let (ty, sub) = essence
            .split_once('/')
            .ok_or_else(|| ParseError::InvalidEssence(essence.to_string()))?;
        if !is_token(ty) || !is_token(sub) {
            return Err(ParseError::InvalidEssence(essence.to_string()));
        }

        let mut params = Vec::new();
        for raw in parts {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (name, value) = raw
                .split_once('=')
                .ok_or_else(|| ParseError::InvalidParameter(raw.to_string()))?;
            let name = name.trim();
            let value = unquote(value.trim());
            if !is_token(name) {
                return Err(ParseError::InvalidParameter(raw.to_string()));
            }
            params.push((name.to_ascii_lowercase(), value.to_string()));
        }

        Ok(Self {
            essence: Cow::Owned(essence.to_ascii_lowercase()),
            params,
        })
    }

    /// `type/subtype`, lowercase
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// Top-level type (`application` in `application/json`)
    pub fn type_(&self) -> &str {
        self.essence.split_once('/').map(|(t, _)| t).unwrap_or_default()
    }

    /// Subtype (`json` in `application/json`)
    pub fn subtype(&self) -> &str {
        self.essence.split_once('/').map(|(_, s)| s).unwrap_or_default()
    }

    /// Parameter value by name (case-insensitive)
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All parameters in declaration order
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Add a parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into().to_ascii_lowercase(), value.into()));
        self
    }

    /// True when either part is `*`
    pub fn is_wildcard(&self) -> bool {
        self.type_() == "*" || self.subtype() == "*"
    }
}

impl PartialEq for MediaType {
    fn eq(&self, other: &Self) -> bool {
        self.essence == other.essence
    }
}

impl Eq for MediaType {}

impl Hash for MediaType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.essence.hash(state);
    }
}

impl FromStr for MediaType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)?;
        for (name, value) in &self.params {
            write!(f, "; {}={}", name, value)?;
        }
        Ok(())
    }
}

/// RFC 9110 token: one or more tchar
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^'
                        | b'_' | b'`' | b'|' | b'~'
                )
        })
}

fn unquote(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_simple() {
        let mt = MediaType::parse("application/json").unwrap();
        assert_eq!(mt.essence(), "application/json");
        assert_eq!(mt.type_(), "application");
        assert_eq!(mt.subtype(), "json");
        assert!(mt.params().is_empty());
    }

    #[test]
    fn test_parse_params() {
        let mt = MediaType::parse(r#"text/plain; Charset="utf-8"; format=flowed"#).unwrap();
        assert_eq!(mt, MediaType::TEXT_PLAIN);
        assert_eq!(mt.param("charset"), Some("utf-8"));
        assert_eq!(mt.param("FORMAT"), Some("flowed"));
        assert_eq!(mt.param("missing"), None);
    }

    #[test]
    fn test_case_insensitive_equality() {
        assert_eq!(MediaType::parse("APPLICATION/Json").unwrap(), MediaType::JSON);
        assert_eq!(MediaType::parse("  application/json  ").unwrap(), MediaType::JSON);
    }

    #[test]
    fn test_params_ignored_by_equality() {
        let a = MediaType::parse("application/json; charset=utf-8").unwrap();
        let b = MediaType::parse("application/json").unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_distinct_types() {
        assert_ne!(MediaType::JSON, MediaType::TEXT_PLAIN);
        assert_ne!(MediaType::JSON, MediaType::XML);
        assert_ne!(MediaType::JSON, MediaType::ANY);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(MediaType::parse(""), Err(ParseError::Empty));
        assert_eq!(MediaType::parse("   "), Err(ParseError::Empty));
        assert!(matches!(MediaType::parse("json"), Err(ParseError::InvalidEssence(_))));
        assert!(matches!(MediaType::parse("/json"), Err(ParseError::InvalidEssence(_))));
        assert!(matches!(
            MediaType::parse("application/json, text/plain"),
            Err(ParseError::InvalidEssence(_))
        ));
        assert!(matches!(
            MediaType::parse("application/json; charset"),
            Err(ParseError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_wildcard() {
        assert!(MediaType::parse("*/*").unwrap().is_wildcard());
        assert!(MediaType::parse("text/*").unwrap().is_wildcard());
        assert!(!MediaType::JSON.is_wildcard());
    }

    #[test]
    fn test_display() {
        assert_eq!(MediaType::JSON.to_string(), "application/json");
        let mt = MediaType::JSON.with_param("charset", "utf-8");
        assert_eq!(mt.to_string(), "application/json; charset=utf-8");
        assert_eq!(MediaType::parse(&mt.to_string()).unwrap(), MediaType::JSON);
    }

    #[test]
    fn test_from_str() {
        let mt: MediaType = "text/plain".parse().unwrap();
        assert_eq!(mt, MediaType::TEXT_PLAIN);
    }
}
