//! Resources and their handlers

use crate::Request;
use serde::{Deserialize, Serialize};

/// Produces the in-memory representation of one resource type
///
/// Handlers are stateless from the host's point of view: a fresh resource is
/// built per request and never shared between responses.
pub trait ResourceHandler: Send + Sync {
    /// Resource type produced by this handler
    type Resource;

    /// Answer a GET on the resource's URI
    fn get(&self, req: &Request) -> Self::Resource;
}

/// The fixture resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MyResource {
    #[serde(rename = "Name", default)]
    pub name: String,
}

/// Handler for [`MyResource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MyResourceHandler;

impl ResourceHandler for MyResourceHandler {
    type Resource = MyResource;

    fn get(&self, _req: &Request) -> MyResource {
        MyResource {
            name: "foobar".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Method;

    #[test]
    fn test_handler_returns_foobar() {
        let req = Request::new(Method::Get, "/MyResource");
        assert_eq!(MyResourceHandler.get(&req).name, "foobar");
    }

    #[test]
    fn test_wire_name() {
        let json = serde_json::to_string(&MyResource {
            name: "foobar".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"Name":"foobar"}"#);

        let decoded: MyResource = serde_json::from_str("{}").unwrap();
        assert_eq!(decoded, MyResource::default());
    }
}
