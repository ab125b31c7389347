//! Request, response and hook models for the GraphQL client
//!
//! This module defines the types exchanged with the endpoint, with callers
//! and with observer hooks.

pub mod hooks;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use hooks::{Hooks, OperationKind, RequestDescriptor, ResponseOutcome, ResponseSource};
pub use requests::{GraphQLRequest, MutationOptions, QueryOptions};
pub use responses::{ErrorLocation, GraphQLError, GraphQLResponse};
