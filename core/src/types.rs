//! Domain and wire DTOs for the todo GraphQL API.
//!
//! # Design
//! `TodoItem` mirrors the `todos` selection set `{ id text done }`. The
//! identifier is kept opaque on the client: the server assigns it and the
//! client only echoes it back in toggle and delete variables.
//!
//! The envelope types describe the GraphQL-over-HTTP request and response
//! bodies. They are defined independently from the mock-server crate;
//! integration tests catch schema drift.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier of a todo item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A single todo item returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub done: bool,
}

/// Variables for `addTodo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTodoVariables {
    pub text: String,
}

/// Variables for `toggleTodo`. `done` is the value to store, not a flip
/// request: the caller negates the current value itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleTodoVariables {
    pub id: TodoId,
    pub done: bool,
}

/// Variables for `deleteTodo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTodoVariables {
    pub id: TodoId,
}

/// `getTodos` takes no variables; serializes as `{}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoVariables {}

/// Body of a GraphQL-over-HTTP POST.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a, V> {
    pub query: &'a str,
    #[serde(rename = "operationName")]
    pub operation_name: &'a str,
    pub variables: &'a V,
}

/// Top-level GraphQL response envelope. `data` is kept as raw JSON until the
/// `errors` array has been checked, since a failed operation may carry a
/// partial or null `data` that would not match the expected shape.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// `data` of `getTodos`.
#[derive(Debug, Clone, Deserialize)]
pub struct TodosData {
    pub todos: Vec<TodoItem>,
}

/// The `returning` payload shared by every mutation.
#[derive(Debug, Clone, Deserialize)]
pub struct MutationResponse {
    pub returning: Vec<TodoItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InsertTodosData {
    pub insert_todos: MutationResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTodosData {
    pub update_todos: MutationResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTodosData {
    pub delete_todos: MutationResponse,
}
