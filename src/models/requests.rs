//! Request models for the GraphQL client
//!
//! Defines the wire body sent to the endpoint and the per-call options
//! accepted by `Client::query` and `Client::mutation`.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body posted to the GraphQL endpoint: `{"query": ..., "variables": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLRequest {
    /// The query or mutation document
    pub query: String,
    /// Operation variables, omitted when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

/// Options for a cached query call.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub query: String,
    pub variables: Option<Value>,
    /// Extra headers for this call only
    pub headers: BTreeMap<String, String>,
    /// Overrides the client's default cache duration for this call
    pub cache_duration: Option<Duration>,
}

impl QueryOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn cache_duration(mut self, duration: Duration) -> Self {
        self.cache_duration = Some(duration);
        self
    }
}

/// Options for an uncached mutation call.
#[derive(Debug, Clone, Default)]
pub struct MutationOptions {
    pub query: String,
    pub variables: Option<Value>,
    /// Extra headers for this call only
    pub headers: BTreeMap<String, String>,
}

impl MutationOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn variables(mut self, variables: Value) -> Self {
        self.variables = Some(variables);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}
