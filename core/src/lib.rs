//! Synchronous GraphQL client core for the todo list.
//!
//! # Overview
//! `TodoClient` builds `HttpRequest` values for the four todo operations and
//! parses `HttpResponse` values without touching the network (host-does-IO
//! pattern). A `Transport` performs the round-trip. `DataClient` layers a
//! normalized cache, observer callbacks and re-fetch-after-mutation on top,
//! and `TodoView` turns form and row gestures into mutations.
//!
//! # Design
//! - Nothing is global: a `DataClient` is built from a `ClientConfig` and a
//!   `Transport`, then handed to the view by mutable reference.
//! - Every successful mutation invalidates the list query and reissues it.
//! - The view observes query status transitions through a registered
//!   callback instead of polling.

pub mod cache;
pub mod client;
pub mod config;
pub mod data_client;
pub mod error;
pub mod http;
pub mod operations;
pub mod transport;
pub mod types;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::NormalizedCache;
pub use client::TodoClient;
pub use config::{ClientConfig, ConfigError};
pub use data_client::{DataClient, Mutation, QueryState, SubscriptionId};
pub use error::{ApiError, ClientError};
pub use http::{HttpRequest, HttpResponse};
pub use operations::Operation;
pub use transport::{Transport, UreqTransport};
pub use types::{TodoId, TodoItem};
pub use view::{Rendered, Row, TodoView, ViewStatus};
