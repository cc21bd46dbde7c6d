//! Stateless GraphQL request builder and response parser for the todo API.
//!
//! # Design
//! `TodoClient` holds only the endpoint URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` executes the round-trip in between, keeping
//! this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::operations::Operation;
use crate::types::{
    AddTodoVariables, DeleteTodoVariables, DeleteTodosData, GraphQlRequest, GraphQlResponse,
    InsertTodosData, NoVariables, TodoId, TodoItem, TodosData, ToggleTodoVariables,
    UpdateTodosData,
};

/// Synchronous, stateless client for the todo GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct TodoClient {
    endpoint: String,
}

impl TodoClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_get_todos(&self) -> Result<HttpRequest, ApiError> {
        self.build(Operation::GetTodos, &NoVariables {})
    }

    pub fn build_add_todo(&self, text: &str) -> Result<HttpRequest, ApiError> {
        let variables = AddTodoVariables {
            text: text.to_string(),
        };
        self.build(Operation::AddTodo, &variables)
    }

    pub fn build_toggle_todo(&self, id: &TodoId, done: bool) -> Result<HttpRequest, ApiError> {
        let variables = ToggleTodoVariables {
            id: id.clone(),
            done,
        };
        self.build(Operation::ToggleTodo, &variables)
    }

    pub fn build_delete_todo(&self, id: &TodoId) -> Result<HttpRequest, ApiError> {
        let variables = DeleteTodoVariables { id: id.clone() };
        self.build(Operation::DeleteTodo, &variables)
    }

    pub fn parse_get_todos(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        let data: TodosData = parse_data(&response)?;
        Ok(data.todos)
    }

    pub fn parse_add_todo(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        let data: InsertTodosData = parse_data(&response)?;
        Ok(data.insert_todos.returning)
    }

    pub fn parse_toggle_todo(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        let data: UpdateTodosData = parse_data(&response)?;
        Ok(data.update_todos.returning)
    }

    pub fn parse_delete_todo(&self, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
        let data: DeleteTodosData = parse_data(&response)?;
        Ok(data.delete_todos.returning)
    }

    fn build<V: Serialize>(&self, operation: Operation, variables: &V) -> Result<HttpRequest, ApiError> {
        let body = GraphQlRequest {
            query: operation.document(),
            operation_name: operation.name(),
            variables,
        };
        let body = serde_json::to_string(&body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            url: self.endpoint.clone(),
            headers: vec![
                ("content-type".to_string(), "application/json".to_string()),
                ("accept".to_string(), "application/json".to_string()),
            ],
            body,
        })
    }
}

/// Check the status, then the GraphQL `errors` array, then decode `data`.
fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    let envelope: GraphQlResponse =
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if !envelope.errors.is_empty() {
        let messages: Vec<&str> = envelope.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(ApiError::GraphQl(messages.join("; ")));
    }
    let data = match envelope.data {
        Some(data) if !data.is_null() => data,
        _ => return Err(ApiError::DeserializationError("response carried no data".to_string())),
    };
    serde_json::from_value(data).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
