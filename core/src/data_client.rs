//! Executes the list query and the three mutations against one endpoint.
//!
//! # Design
//! `DataClient` owns the request builder, a `Transport`, the normalized cache
//! and the current `QueryState` of the list query. Observers registered with
//! `subscribe` are called on every status transition: once with `loading`
//! set before the round-trip, once with the result or error after it.
//!
//! A successful mutation merges its `returning` rows into the cache (or
//! evicts them, for delete), then runs the post-mutation hook: invalidate the
//! list and reissue it. A failed mutation is reported once, leaves the cache
//! and `QueryState` untouched, and does not re-fetch. Nothing is retried.

use tracing::{debug, info, warn};

use crate::cache::NormalizedCache;
use crate::client::TodoClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError};
use crate::operations::Operation;
use crate::transport::Transport;
use crate::types::{TodoId, TodoItem};

/// Result of the list query as observers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub loading: bool,
    pub error: Option<ClientError>,
    pub items: Vec<TodoItem>,
}

impl Default for QueryState {
    /// Nothing has been fetched yet, which reads as loading.
    fn default() -> Self {
        Self {
            loading: true,
            error: None,
            items: Vec::new(),
        }
    }
}

/// A write against the todo collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Create { text: String },
    /// Store `done` as given; the caller has already negated it.
    Toggle { id: TodoId, done: bool },
    Delete { id: TodoId },
}

impl Mutation {
    pub fn operation(&self) -> Operation {
        match self {
            Mutation::Create { .. } => Operation::AddTodo,
            Mutation::Toggle { .. } => Operation::ToggleTodo,
            Mutation::Delete { .. } => Operation::DeleteTodo,
        }
    }
}

/// Handle returned by `DataClient::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&QueryState)>;

pub struct DataClient<T> {
    client: TodoClient,
    transport: T,
    cache: NormalizedCache,
    state: QueryState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl<T: Transport> DataClient<T> {
    pub fn new(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: TodoClient::new(&config.endpoint),
            transport,
            cache: NormalizedCache::new(),
            state: QueryState::default(),
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn cache(&self) -> &NormalizedCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Register `observer` for every status transition of the list query.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&QueryState) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Current state of the list query, fetching first if nothing has been
    /// fetched yet or the cached list was invalidated.
    pub fn query(&mut self) -> &QueryState {
        if !self.cache.has_list() || self.cache.is_stale() {
            self.fetch_list();
        }
        &self.state
    }

    /// Invalidate the list and reissue it.
    pub fn refetch(&mut self) -> &QueryState {
        self.cache.invalidate();
        self.fetch_list();
        &self.state
    }

    /// Send `mutation`; on success, update the cache and re-fetch the list.
    /// Returns the rows the server reported as affected.
    pub fn mutate(&mut self, mutation: Mutation) -> Result<Vec<TodoItem>, ClientError> {
        let operation = mutation.operation();
        let returning = self.send(&mutation).map_err(|source| {
            warn!(%operation, error = %source, "mutation failed");
            ClientError::Mutation { operation, source }
        })?;

        match &mutation {
            Mutation::Delete { id } => {
                self.cache.evict(id);
                for item in &returning {
                    self.cache.evict(&item.id);
                }
            }
            Mutation::Create { .. } | Mutation::Toggle { .. } => self.cache.merge(&returning),
        }
        info!(%operation, affected = returning.len(), "mutation completed");

        self.refetch();
        Ok(returning)
    }

    fn send(&self, mutation: &Mutation) -> Result<Vec<TodoItem>, ApiError> {
        match mutation {
            Mutation::Create { text } => {
                let request = self.client.build_add_todo(text)?;
                self.client.parse_add_todo(self.transport.execute(request)?)
            }
            Mutation::Toggle { id, done } => {
                let request = self.client.build_toggle_todo(id, *done)?;
                self.client.parse_toggle_todo(self.transport.execute(request)?)
            }
            Mutation::Delete { id } => {
                let request = self.client.build_delete_todo(id)?;
                self.client.parse_delete_todo(self.transport.execute(request)?)
            }
        }
    }

    fn fetch_list(&mut self) {
        self.state.loading = true;
        self.notify();

        debug!(endpoint = %self.client.endpoint(), "fetching todos");
        let result = self
            .client
            .build_get_todos()
            .and_then(|request| self.transport.execute(request))
            .and_then(|response| self.client.parse_get_todos(response));

        self.state = match result {
            Ok(items) => {
                self.cache.write_list(items);
                QueryState {
                    loading: false,
                    error: None,
                    items: self.cache.read_list().unwrap_or_default(),
                }
            }
            Err(source) => {
                warn!(error = %source, "fetching todos failed");
                QueryState {
                    loading: false,
                    error: Some(ClientError::Fetch(source)),
                    items: Vec::new(),
                }
            }
        };
        self.notify();
    }

    fn notify(&mut self) {
        for (_, observer) in self.observers.iter_mut() {
            observer(&self.state);
        }
    }
}
