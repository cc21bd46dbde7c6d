//! Error types for the todo GraphQL client.
//!
//! # Design
//! `ApiError` describes why a single HTTP/GraphQL exchange failed, at the
//! level of the wire. `ClientError` is what the data client and the view
//! surface: a failed list query is a `Fetch`, a failed write is a `Mutation`
//! tagged with the operation that failed. Both are `Clone` so the last query
//! error can live inside `QueryState` snapshots handed to observers.

use thiserror::Error;

use crate::operations::Operation;

/// Errors returned by `TodoClient` parse methods and by transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The GraphQL envelope carried a non-empty `errors` array.
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connect, TLS, timeout, ...).
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Errors surfaced by `DataClient` and `TodoView`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// The list query failed.
    #[error("failed to fetch todos: {0}")]
    Fetch(#[source] ApiError),

    /// A create, toggle or delete failed. The cached collection is unchanged.
    #[error("{operation} failed: {source}")]
    Mutation {
        operation: Operation,
        #[source]
        source: ApiError,
    },
}

impl ClientError {
    /// The wire-level cause.
    pub fn api_error(&self) -> &ApiError {
        match self {
            ClientError::Fetch(source) => source,
            ClientError::Mutation { source, .. } => source,
        }
    }
}
