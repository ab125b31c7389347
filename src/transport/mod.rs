//! Transport Module
//!
//! The network capability the client sends requests through. The client only
//! depends on the `Transport` trait; `HttpTransport` is the default
//! implementation built on reqwest.

mod http;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::GraphQLRequest;

pub use http::HttpTransport;

/// Everything a transport needs to perform one call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: String,
    pub uri: String,
    pub headers: BTreeMap<String, String>,
    /// Credential inclusion policy, e.g. `"include"`
    pub credentials: String,
    pub body: GraphQLRequest,
}

/// Sends a GraphQL request and returns the parsed JSON body.
///
/// Implementations report connectivity problems, non-success statuses and
/// unparseable bodies as errors. GraphQL-level errors inside a well-formed
/// body are not errors at this layer.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<Value>;
}
