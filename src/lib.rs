//! gql_cache - A GraphQL-over-HTTP client with an in-memory response cache
//!
//! Queries are answered from a TTL cache keyed by query text and variables;
//! mutations always reach the network. Caches can be shared between clients
//! and exported to JSON for hydrating another instance.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod transport;

pub use cache::{CacheStore, SerializedEntry, SharedCache};
pub use client::Client;
pub use config::{CacheOptions, ClientConfig};
pub use error::{ClientError, Result};
pub use models::{GraphQLResponse, Hooks, MutationOptions, QueryOptions};
pub use transport::{HttpTransport, Transport, TransportRequest};
