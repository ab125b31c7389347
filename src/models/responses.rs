//! Response models for the GraphQL client
//!
//! Defines the `{data, errors}` envelope returned by the endpoint and by
//! `Client::query` / `Client::mutation`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A GraphQL response envelope.
///
/// `errors` is `None` for cache hits and for responses whose error list was
/// empty or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    /// Result payload, possibly null or partial when errors are present
    #[serde(default)]
    pub data: Option<Value>,
    /// GraphQL-level errors reported by the endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<GraphQLError>>,
}

impl GraphQLResponse {
    /// Builds the response returned for a cache hit.
    ///
    /// A cached JSON null comes back as `data: None`, matching how the
    /// original response deserialized.
    pub fn from_cache(data: Value) -> Self {
        Self {
            data: (!data.is_null()).then_some(data),
            errors: None,
        }
    }

    /// True when the endpoint reported at least one error.
    pub fn has_errors(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Drops an empty error list so callers only ever see `None` or a
    /// non-empty list.
    pub fn normalized(mut self) -> Self {
        if !self.has_errors() {
            self.errors = None;
        }
        self
    }
}

/// A single GraphQL error entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<ErrorLocation>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Value>,
}

/// Position of an error in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLocation {
    pub line: u32,
    pub column: u32,
}
