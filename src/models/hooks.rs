//! Hook payloads
//!
//! Observers invoked by the client before and after every call. Hooks get
//! shared references only, so they can log or record but never change what
//! the caller receives.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheKey;
use crate::error::ClientError;
use crate::models::{GraphQLRequest, GraphQLResponse};

/// Which client operation produced a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Cache,
    Network,
}

/// Describes a call before any cache or network work happens.
#[derive(Debug, Clone, Serialize)]
pub struct RequestDescriptor {
    pub operation: OperationKind,
    pub uri: String,
    pub method: String,
    /// Configured headers merged with per-call headers
    pub headers: BTreeMap<String, String>,
    pub body: GraphQLRequest,
    /// Effective cache duration for queries; `None` for mutations and
    /// unbounded queries
    #[serde(skip_serializing_if = "Option::is_none", with = "duration_ms")]
    pub cache_duration: Option<Duration>,
    pub issued_at: DateTime<Utc>,
}

/// Describes how a call ended, successful or not.
#[derive(Debug)]
pub struct ResponseOutcome<'a> {
    pub request: &'a RequestDescriptor,
    /// Set for queries, `None` for mutations
    pub cache_key: Option<CacheKey>,
    /// `None` when the transport failed before producing a response
    pub source: Option<ResponseSource>,
    pub result: std::result::Result<&'a GraphQLResponse, &'a ClientError>,
}

impl ResponseOutcome<'_> {
    pub fn is_cache_hit(&self) -> bool {
        self.source == Some(ResponseSource::Cache)
    }
}

pub type RequestHook = Arc<dyn Fn(&RequestDescriptor) + Send + Sync>;
pub type ResponseHook = Arc<dyn Fn(&ResponseOutcome<'_>) + Send + Sync>;

/// Optional observer callbacks.
#[derive(Clone, Default)]
pub struct Hooks {
    pub request: Option<RequestHook>,
    pub response: Option<ResponseHook>,
}

impl Hooks {
    pub fn on_request(mut self, hook: impl Fn(&RequestDescriptor) + Send + Sync + 'static) -> Self {
        self.request = Some(Arc::new(hook));
        self
    }

    pub fn on_response(
        mut self,
        hook: impl Fn(&ResponseOutcome<'_>) + Send + Sync + 'static,
    ) -> Self {
        self.response = Some(Arc::new(hook));
        self
    }

    pub(crate) fn request(&self, descriptor: &RequestDescriptor) {
        if let Some(hook) = &self.request {
            hook(descriptor);
        }
    }

    pub(crate) fn response(&self, outcome: &ResponseOutcome<'_>) {
        if let Some(hook) = &self.response {
            hook(outcome);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("request", &self.request.is_some())
            .field("response", &self.response.is_some())
            .finish()
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => {
                let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
                serializer.serialize_u64(millis)
            }
            None => serializer.serialize_none(),
        }
    }
}
