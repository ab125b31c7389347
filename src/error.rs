//! Error types for the GraphQL cache client
//!
//! Provides unified error handling using thiserror. GraphQL-level errors are
//! not represented here: they travel inside a successful `GraphQLResponse`.

use thiserror::Error;

// == Client Error Enum ==
/// Unified error type for transport and configuration failures.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Network or connection level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body was not a decodable GraphQL response
    #[error("Decode error: {0}")]
    Decode(String),

    /// Cache snapshot could not be read or written
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the client.
pub type Result<T> = std::result::Result<T, ClientError>;
