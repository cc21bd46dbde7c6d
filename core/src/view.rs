//! Headless view component for the todo list.
//!
//! # Design
//! `TodoView` borrows a `DataClient` for its whole lifetime. Mounting
//! registers an observer that mirrors every `QueryState` transition into the
//! view's snapshot, then issues the list query. Status is derived from the
//! snapshot: `Loading` while a fetch is in flight, `Failed` once a fetch
//! errored, `Ready` otherwise.
//!
//! Gestures map to mutations:
//! - `submit` sends Create with the trimmed input and clears the input only
//!   when the mutation succeeds; blank input does nothing.
//! - `double_activate` sends Toggle with the row's `done` negated.
//! - `activate_delete` sends Delete for the row's id.
//!
//! `render` produces plain data; `render_lines` formats it for a terminal.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::data_client::{DataClient, Mutation, QueryState, SubscriptionId};
use crate::error::ClientError;
use crate::transport::Transport;
use crate::types::{TodoId, TodoItem};

pub const TITLE: &str = "GraphQL Todo App ✔️";
pub const LOADING_MESSAGE: &str = "Loading...";
pub const EMPTY_MESSAGE: &str = "No todos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Ready,
    Failed,
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: TodoId,
    pub text: String,
    /// Done rows are drawn struck through.
    pub struck: bool,
}

impl From<&TodoItem> for Row {
    fn from(item: &TodoItem) -> Self {
        Self {
            id: item.id.clone(),
            text: item.text.clone(),
            struck: item.done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Loading,
    Failed(String),
    Empty,
    List(Vec<Row>),
}

pub struct TodoView<'c, T: Transport> {
    client: &'c mut DataClient<T>,
    snapshot: Rc<RefCell<QueryState>>,
    subscription: SubscriptionId,
    input: String,
}

impl<'c, T: Transport> TodoView<'c, T> {
    /// Subscribe to the list query and issue it.
    pub fn mount(client: &'c mut DataClient<T>) -> Self {
        let snapshot = Rc::new(RefCell::new(client.state().clone()));
        let sink = Rc::clone(&snapshot);
        let subscription = client.subscribe(move |state| *sink.borrow_mut() = state.clone());
        client.query();
        Self {
            client,
            snapshot,
            subscription,
            input: String::new(),
        }
    }

    pub fn client(&self) -> &DataClient<T> {
        &*self.client
    }

    pub fn status(&self) -> ViewStatus {
        let state = self.snapshot.borrow();
        if state.loading {
            ViewStatus::Loading
        } else if state.error.is_some() {
            ViewStatus::Failed
        } else {
            ViewStatus::Ready
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Rows in server order; empty unless the view is `Ready`.
    pub fn rows(&self) -> Vec<Row> {
        match self.render() {
            Rendered::List(rows) => rows,
            _ => Vec::new(),
        }
    }

    pub fn render(&self) -> Rendered {
        let state = self.snapshot.borrow();
        match self.status() {
            ViewStatus::Loading => Rendered::Loading,
            ViewStatus::Failed => Rendered::Failed(
                state
                    .error
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_default(),
            ),
            ViewStatus::Ready if state.items.is_empty() => Rendered::Empty,
            ViewStatus::Ready => Rendered::List(state.items.iter().map(Row::from).collect()),
        }
    }

    pub fn render_lines(&self) -> Vec<String> {
        match self.render() {
            Rendered::Loading => vec![LOADING_MESSAGE.to_string()],
            Rendered::Failed(message) => vec![message],
            Rendered::Empty => vec![TITLE.to_string(), EMPTY_MESSAGE.to_string()],
            Rendered::List(rows) => {
                let mut lines = Vec::with_capacity(rows.len() + 1);
                lines.push(TITLE.to_string());
                for (index, row) in rows.iter().enumerate() {
                    let line = if row.struck {
                        format!("{:>3}. [x] {}", index + 1, strike(&row.text))
                    } else {
                        format!("{:>3}. [ ] {}", index + 1, row.text)
                    };
                    lines.push(line);
                }
                lines
            }
        }
    }

    /// Submit the create form. Returns `Ok(false)` when nothing was sent:
    /// the trimmed input is empty, or the form is not shown because the view
    /// is loading or failed.
    pub fn submit(&mut self) -> Result<bool, ClientError> {
        if self.status() != ViewStatus::Ready {
            return Ok(false);
        }
        let text = self.input.trim();
        if text.is_empty() {
            debug!("ignoring blank todo input");
            return Ok(false);
        }
        let text = text.to_string();
        self.client.mutate(Mutation::Create { text })?;
        self.input.clear();
        Ok(true)
    }

    /// Toggle the row with `id`. Returns `Ok(false)` if no such row is shown.
    pub fn double_activate(&mut self, id: &TodoId) -> Result<bool, ClientError> {
        let Some(done) = self.shown_item(id).map(|item| item.done) else {
            return Ok(false);
        };
        self.client.mutate(Mutation::Toggle {
            id: id.clone(),
            done: !done,
        })?;
        Ok(true)
    }

    /// Delete the row with `id`. Returns `Ok(false)` if no such row is shown.
    pub fn activate_delete(&mut self, id: &TodoId) -> Result<bool, ClientError> {
        if self.shown_item(id).is_none() {
            return Ok(false);
        }
        self.client.mutate(Mutation::Delete { id: id.clone() })?;
        Ok(true)
    }

    fn shown_item(&self, id: &TodoId) -> Option<TodoItem> {
        if self.status() != ViewStatus::Ready {
            return None;
        }
        self.snapshot
            .borrow()
            .items
            .iter()
            .find(|item| &item.id == id)
            .cloned()
    }
}

impl<T: Transport> Drop for TodoView<'_, T> {
    fn drop(&mut self) {
        self.client.unsubscribe(self.subscription);
    }
}

/// Overlay each character with U+0336 COMBINING LONG STROKE OVERLAY.
fn strike(text: &str) -> String {
    text.chars().flat_map(|c| [c, '\u{0336}']).collect()
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::config::ClientConfig;
    use crate::operations::Operation;
    use crate::testing::FakeServer;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Padded non-blank input creates exactly one undone item holding
        /// the trimmed text, and the form is cleared.
        #[test]
        fn submit_stores_trimmed_text(
            leading in "[ \t]{0,4}",
            text in "[A-Za-z0-9]([A-Za-z0-9 .,!-]{0,24}[A-Za-z0-9])?",
            trailing in "[ \t\n]{0,4}",
        ) {
            let server = FakeServer::new();
            let mut client = DataClient::new(&ClientConfig::default(), &server);
            let mut view = TodoView::mount(&mut client);

            view.set_input(format!("{leading}{text}{trailing}"));
            prop_assert!(view.submit().unwrap());
            prop_assert_eq!(view.input(), "");

            let rows = view.rows();
            prop_assert_eq!(rows.len(), 1);
            prop_assert_eq!(&rows[0].text, &text);
            prop_assert!(!rows[0].struck);
            drop(view);

            let items = server.items();
            prop_assert_eq!(items.len(), 1);
            prop_assert_eq!(&items[0].text, &text);
            prop_assert!(!items[0].done);
            prop_assert_eq!(
                server.calls(),
                vec![Operation::GetTodos, Operation::AddTodo, Operation::GetTodos]
            );
        }

        /// Whitespace-only input sends nothing and leaves the form as typed.
        #[test]
        fn blank_input_sends_nothing(blank in "[ \t\n]{0,8}") {
            let server = FakeServer::new();
            let mut client = DataClient::new(&ClientConfig::default(), &server);
            let mut view = TodoView::mount(&mut client);

            view.set_input(blank.clone());
            prop_assert!(!view.submit().unwrap());
            prop_assert_eq!(view.input(), blank.as_str());
            drop(view);
            prop_assert_eq!(server.calls(), vec![Operation::GetTodos]);
        }
    }
}
