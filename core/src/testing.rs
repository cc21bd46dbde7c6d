//! In-process fake of the todo GraphQL endpoint for unit tests.
//!
//! Dispatches on `operationName` and applies the variables to an in-memory
//! list, answering with the same envelopes the real server produces. Every
//! call is recorded; `fail_next` and `fail_call` make a chosen call fail
//! without touching the list.

use std::cell::{Cell, RefCell};

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operations::Operation;
use crate::transport::Transport;
use crate::types::{TodoId, TodoItem};

#[derive(Debug, Default)]
pub(crate) struct FakeServer {
    items: RefCell<Vec<TodoItem>>,
    calls: RefCell<Vec<Operation>>,
    /// Pending failures keyed by 0-based call index.
    failures: RefCell<Vec<(usize, ApiError)>>,
    next_id: Cell<u32>,
}

impl FakeServer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_items(items: &[(&str, bool)]) -> Self {
        let server = Self::new();
        for (text, done) in items {
            let id = server.allocate_id();
            server.items.borrow_mut().push(TodoItem {
                id,
                text: text.to_string(),
                done: *done,
            });
        }
        server
    }

    pub(crate) fn calls(&self) -> Vec<Operation> {
        self.calls.borrow().clone()
    }

    pub(crate) fn items(&self) -> Vec<TodoItem> {
        self.items.borrow().clone()
    }

    pub(crate) fn fail_next(&self, error: ApiError) {
        let index = self.calls.borrow().len();
        self.fail_call(index, error);
    }

    /// Fail the call at 0-based `index`, counting every call since creation.
    pub(crate) fn fail_call(&self, index: usize, error: ApiError) {
        self.failures.borrow_mut().push((index, error));
    }

    fn allocate_id(&self) -> TodoId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        TodoId::new(id.to_string())
    }

    fn handle(&self, operation: Operation, variables: &Value) -> Value {
        let mut items = self.items.borrow_mut();
        match operation {
            Operation::GetTodos => json!({ "data": { "todos": *items } }),
            Operation::AddTodo => {
                let item = TodoItem {
                    id: self.allocate_id(),
                    text: variables["text"].as_str().unwrap_or_default().to_string(),
                    done: false,
                };
                items.push(item.clone());
                json!({ "data": { "insert_todos": { "returning": [item] } } })
            }
            Operation::ToggleTodo => {
                let id = variables["id"].as_str().unwrap_or_default();
                let done = variables["done"].as_bool().unwrap_or_default();
                let mut returning = Vec::new();
                for item in items.iter_mut().filter(|item| item.id.as_str() == id) {
                    item.done = done;
                    returning.push(item.clone());
                }
                json!({ "data": { "update_todos": { "returning": returning } } })
            }
            Operation::DeleteTodo => {
                let id = variables["id"].as_str().unwrap_or_default();
                let (returning, kept): (Vec<_>, Vec<_>) =
                    items.drain(..).partition(|item| item.id.as_str() == id);
                *items = kept;
                json!({ "data": { "delete_todos": { "returning": returning } } })
            }
        }
    }
}

impl Transport for FakeServer {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let body: Value = serde_json::from_str(&request.body).expect("request body is JSON");
        let operation = body["operationName"]
            .as_str()
            .and_then(Operation::from_name)
            .expect("known operation name");
        assert_eq!(body["query"], operation.document(), "document matches operation");
        let index = {
            let mut calls = self.calls.borrow_mut();
            calls.push(operation);
            calls.len() - 1
        };

        let mut failures = self.failures.borrow_mut();
        if let Some(pos) = failures.iter().position(|(at, _)| *at == index) {
            return Err(failures.remove(pos).1);
        }
        drop(failures);
        let response = self.handle(operation, &body["variables"]);
        Ok(HttpResponse::ok_json(response.to_string()))
    }
}
