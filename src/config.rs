//! Configuration Module
//!
//! Client configuration, either assembled in code or loaded from environment
//! variables.

use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{SerializedEntry, SharedCache};
use crate::error::{ClientError, Result};
use crate::models::Hooks;
use crate::transport::Transport;

/// Default HTTP method for every call
pub const DEFAULT_METHOD: &str = "POST";

/// Default credential inclusion policy
pub const DEFAULT_CREDENTIALS: &str = "include";

/// Content type sent unless a header overrides it
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

// == Cache Options ==
/// How the client's response cache is created and how long entries live.
#[derive(Clone, Default)]
pub struct CacheOptions {
    /// Default entry lifetime; `None` never expires
    pub duration: Option<Duration>,
    /// Externally owned store, possibly shared with other clients.
    /// Takes precedence over `json_cache`.
    pub store: Option<SharedCache>,
    /// Exported snapshot used to hydrate a fresh store
    pub json_cache: Option<Vec<SerializedEntry>>,
}

impl fmt::Debug for CacheOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("duration", &self.duration)
            .field("store", &self.store.is_some())
            .field("json_cache", &self.json_cache.as_ref().map(Vec::len))
            .finish()
    }
}

// == Client Config ==
/// Client configuration parameters.
#[derive(Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint
    pub uri: String,
    /// HTTP method used for queries and mutations
    pub method: String,
    /// Network capability; `None` uses `HttpTransport`
    pub transport: Option<Arc<dyn Transport>>,
    /// Headers merged into every request, on top of a JSON content type.
    /// Names are matched case-insensitively.
    pub headers: BTreeMap<String, String>,
    /// Credential inclusion policy forwarded to the transport
    pub credentials: String,
    pub cache: CacheOptions,
    pub hooks: Hooks,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("uri", &self.uri)
            .field("method", &self.method)
            .field("transport", &self.transport.is_some())
            .field("headers", &self.headers)
            .field("credentials", &self.credentials)
            .field("cache", &self.cache)
            .field("hooks", &self.hooks)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for `uri` with default settings.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            method: DEFAULT_METHOD.to_string(),
            transport: None,
            headers: BTreeMap::new(),
            credentials: DEFAULT_CREDENTIALS.to_string(),
            cache: CacheOptions::default(),
            hooks: Hooks::default(),
        }
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `GRAPHQL_URI` - Endpoint (required)
    /// - `GRAPHQL_METHOD` - HTTP method (default: POST)
    /// - `GRAPHQL_CREDENTIALS` - Credential policy (default: include)
    /// - `CACHE_DURATION_MS` - Default cache TTL in milliseconds (default: unbounded)
    pub fn from_env() -> Result<Self> {
        let uri = env::var("GRAPHQL_URI")
            .map_err(|_| ClientError::InvalidConfig("GRAPHQL_URI is not set".to_string()))?;

        let mut config = Self::new(uri);
        if let Ok(method) = env::var("GRAPHQL_METHOD") {
            config.method = method.to_uppercase();
        }
        if let Ok(credentials) = env::var("GRAPHQL_CREDENTIALS") {
            config.credentials = credentials;
        }
        config.cache.duration = env::var("CACHE_DURATION_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis);

        Ok(config)
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_credentials(mut self, credentials: impl Into<String>) -> Self {
        self.credentials = credentials.into();
        self
    }

    pub fn with_cache_duration(mut self, duration: Duration) -> Self {
        self.cache.duration = Some(duration);
        self
    }

    pub fn with_shared_cache(mut self, store: SharedCache) -> Self {
        self.cache.store = Some(store);
        self
    }

    pub fn with_json_cache(mut self, records: Vec<SerializedEntry>) -> Self {
        self.cache.json_cache = Some(records);
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Headers as sent on the wire: lower-cased names, with the default
    /// content type unless a configured header replaces it.
    pub fn normalized_headers(&self) -> BTreeMap<String, String> {
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), DEFAULT_CONTENT_TYPE.to_string());
        headers.extend(
            self.headers
                .iter()
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone())),
        );
        headers
    }

    // == Validate ==
    /// Checks that the endpoint and method are usable.
    pub fn validate(&self) -> Result<()> {
        if self.uri.trim().is_empty() {
            return Err(ClientError::InvalidConfig("uri cannot be empty".to_string()));
        }
        let method_ok = !self.method.is_empty()
            && self.method.bytes().all(|b| b.is_ascii_uppercase());
        if !method_ok {
            return Err(ClientError::InvalidConfig(format!(
                "method '{}' must be an uppercase HTTP verb",
                self.method
            )));
        }
        Ok(())
    }
}
