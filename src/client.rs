//! GraphQL Client
//!
//! Dispatches queries and mutations. Queries go through the response cache;
//! mutations always reach the transport and never touch the cache.
//!
//! The store lock is only held for the synchronous lookup and insert, never
//! across the transport call. Identical queries issued concurrently are not
//! deduplicated: each one misses, each one reaches the transport, and the
//! last to finish owns the cache entry.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{self, derive_cache_key, CacheKey, CacheStats, CacheStore, SerializedEntry, SharedCache};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{
    GraphQLRequest, GraphQLResponse, Hooks, MutationOptions, OperationKind, QueryOptions,
    RequestDescriptor, ResponseOutcome, ResponseSource,
};
use crate::transport::{HttpTransport, Transport, TransportRequest};

// == Client ==
/// GraphQL-over-HTTP client with an in-memory response cache.
///
/// Cloning is cheap and clones share the cache, transport and hooks.
#[derive(Clone)]
pub struct Client {
    uri: String,
    method: String,
    headers: BTreeMap<String, String>,
    credentials: String,
    default_duration: Option<Duration>,
    transport: Arc<dyn Transport>,
    cache: SharedCache,
    hooks: Hooks,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("default_duration", &self.default_duration)
            .finish_non_exhaustive()
    }
}

impl Client {
    // == Constructor ==
    /// Builds a client from its configuration.
    ///
    /// The cache is, in order of precedence: the injected shared store, a
    /// store hydrated from `json_cache`, or a fresh empty store.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let headers = config.normalized_headers();

        let ClientConfig {
            uri,
            method,
            transport,
            credentials,
            cache,
            hooks,
            ..
        } = config;

        let store = match (cache.store, cache.json_cache) {
            (Some(store), _) => store,
            (None, Some(records)) => cache::shared(CacheStore::from_serializable(records)),
            (None, None) => cache::shared(CacheStore::new()),
        };

        let transport: Arc<dyn Transport> = match transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };

        info!("GraphQL client created for {} {}", method, uri);

        Ok(Self {
            uri,
            method,
            headers,
            credentials,
            default_duration: cache.duration,
            transport,
            cache: store,
            hooks,
        })
    }

    // == Query ==
    /// Runs a query, answering from the cache when a fresh entry exists.
    ///
    /// Error-free responses are cached for the per-call duration, else the
    /// configured default, else forever. Responses carrying GraphQL errors are
    /// returned but never cached. Transport failures are returned as `Err`.
    pub async fn query(&self, options: QueryOptions) -> Result<GraphQLResponse> {
        let QueryOptions {
            query,
            variables,
            headers,
            cache_duration,
        } = options;

        let duration = cache_duration.or(self.default_duration);
        let descriptor = self.describe(OperationKind::Query, query, variables, headers, duration);
        self.hooks.request(&descriptor);

        let key = derive_cache_key(&descriptor.body.query, descriptor.body.variables.as_ref());

        let cached = self.cache.write().await.get(key);
        if let Some(data) = cached {
            debug!("Cache hit for key {}", key);
            let response = GraphQLResponse::from_cache(data);
            self.notify(&descriptor, Some(key), Some(ResponseSource::Cache), Ok(&response));
            return Ok(response);
        }

        debug!("Cache miss for key {}", key);
        let result = self.execute(&descriptor).await;

        if let Ok(response) = &result {
            if response.has_errors() {
                debug!("Response for key {} carried errors, not caching", key);
            } else {
                self.store(key, response, duration).await;
            }
        }

        self.notify_result(&descriptor, Some(key), &result);
        result
    }

    // == Mutation ==
    /// Runs a mutation. The cache is neither consulted nor updated.
    pub async fn mutation(&self, options: MutationOptions) -> Result<GraphQLResponse> {
        let MutationOptions {
            query,
            variables,
            headers,
        } = options;

        let descriptor = self.describe(OperationKind::Mutation, query, variables, headers, None);
        self.hooks.request(&descriptor);

        let result = self.execute(&descriptor).await;

        self.notify_result(&descriptor, None, &result);
        result
    }

    // == Cache Management ==
    /// Removes every cached response.
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("Response cache cleared");
    }

    /// Exports the cache for later hydration with `CacheOptions::json_cache`.
    pub async fn cache_to_json(&self) -> Vec<SerializedEntry> {
        self.cache.read().await.to_serializable()
    }

    /// Returns current cache statistics.
    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Handle to the underlying store, for sharing with another client.
    pub fn cache(&self) -> SharedCache {
        Arc::clone(&self.cache)
    }

    // == Internals ==
    fn describe(
        &self,
        operation: OperationKind,
        query: String,
        variables: Option<Value>,
        extra_headers: BTreeMap<String, String>,
        cache_duration: Option<Duration>,
    ) -> RequestDescriptor {
        let mut headers = self.headers.clone();
        headers.extend(
            extra_headers
                .into_iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value)),
        );

        RequestDescriptor {
            operation,
            uri: self.uri.clone(),
            method: self.method.clone(),
            headers,
            body: GraphQLRequest { query, variables },
            cache_duration,
            issued_at: Utc::now(),
        }
    }

    async fn execute(&self, descriptor: &RequestDescriptor) -> Result<GraphQLResponse> {
        let request = TransportRequest {
            method: descriptor.method.clone(),
            uri: descriptor.uri.clone(),
            headers: descriptor.headers.clone(),
            credentials: self.credentials.clone(),
            body: descriptor.body.clone(),
        };

        let raw = self.transport.send(request).await.map_err(|err| {
            warn!("{:?} request to {} failed: {}", descriptor.operation, descriptor.uri, err);
            err
        })?;

        if !raw.is_object() {
            warn!("Response from {} is not a JSON object", descriptor.uri);
            return Err(ClientError::Decode("response body is not a JSON object".to_string()));
        }

        let response: GraphQLResponse = serde_json::from_value(raw).map_err(|err| {
            warn!("Undecodable response from {}: {}", descriptor.uri, err);
            err
        })?;

        Ok(response.normalized())
    }

    async fn store(&self, key: CacheKey, response: &GraphQLResponse, duration: Option<Duration>) {
        let data = response.data.clone().unwrap_or(Value::Null);
        self.cache.write().await.set(key, data, duration);
        debug!("Cached response under key {} (ttl={:?})", key, duration);
    }

    fn notify_result(
        &self,
        descriptor: &RequestDescriptor,
        cache_key: Option<CacheKey>,
        result: &Result<GraphQLResponse>,
    ) {
        let (source, result) = match result {
            Ok(response) => (Some(ResponseSource::Network), Ok(response)),
            Err(err) => (None, Err(err)),
        };
        self.notify(descriptor, cache_key, source, result);
    }

    fn notify(
        &self,
        descriptor: &RequestDescriptor,
        cache_key: Option<CacheKey>,
        source: Option<ResponseSource>,
        result: std::result::Result<&GraphQLResponse, &ClientError>,
    ) {
        self.hooks.response(&ResponseOutcome {
            request: descriptor,
            cache_key,
            source,
            result,
        });
    }
}
