//! In-memory GraphQL todo server.
//!
//! Serves the Hasura-shaped schema the client targets: a `todos` query and
//! `insert_todos` / `update_todos` / `delete_todos` mutations that answer
//! with the affected rows under `returning`. Identifiers use a `uuid` scalar.
//! Rows are kept in insertion order.

use std::sync::Arc;

use async_graphql::{
    Context, EmptySubscription, Error, InputObject, InputValueError, InputValueResult, Object,
    Result, Scalar, ScalarType, Schema, SimpleObject, Value,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoUuid(pub Uuid);

#[Scalar(name = "uuid")]
impl ScalarType for TodoUuid {
    fn parse(value: Value) -> InputValueResult<Self> {
        if let Value::String(raw) = &value {
            return Uuid::parse_str(raw)
                .map(TodoUuid)
                .map_err(InputValueError::custom);
        }
        Err(InputValueError::expected_type(value))
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.to_string())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[graphql(name = "todos")]
pub struct Todo {
    pub id: TodoUuid,
    pub text: String,
    pub done: bool,
}

#[derive(Debug, SimpleObject)]
#[graphql(name = "todos_mutation_response")]
pub struct TodosMutationResponse {
    #[graphql(name = "affected_rows")]
    pub affected_rows: i32,
    pub returning: Vec<Todo>,
}

impl From<Vec<Todo>> for TodosMutationResponse {
    fn from(returning: Vec<Todo>) -> Self {
        Self {
            affected_rows: returning.len() as i32,
            returning,
        }
    }
}

#[derive(Debug, InputObject)]
#[graphql(name = "todos_insert_input")]
pub struct TodosInsertInput {
    pub text: String,
    pub done: Option<bool>,
}

#[derive(Debug, InputObject)]
#[graphql(name = "uuid_comparison_exp")]
pub struct UuidComparisonExp {
    #[graphql(name = "_eq")]
    pub eq: Option<TodoUuid>,
}

#[derive(Debug, InputObject)]
#[graphql(name = "todos_bool_exp")]
pub struct TodosBoolExp {
    pub id: Option<UuidComparisonExp>,
}

impl TodosBoolExp {
    fn matches(&self, todo: &Todo) -> bool {
        match self.id.as_ref().and_then(|cmp| cmp.eq) {
            Some(id) => todo.id == id,
            None => true,
        }
    }
}

#[derive(Debug, InputObject)]
#[graphql(name = "todos_set_input")]
pub struct TodosSetInput {
    pub text: Option<String>,
    pub done: Option<bool>,
}

pub type Db = Arc<RwLock<Vec<Todo>>>;

pub type TodoSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn todos(&self, ctx: &Context<'_>) -> Result<Vec<Todo>> {
        let db = ctx.data::<Db>()?;
        Ok(db.read().await.clone())
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    #[graphql(name = "insert_todos")]
    async fn insert_todos(
        &self,
        ctx: &Context<'_>,
        objects: Vec<TodosInsertInput>,
    ) -> Result<TodosMutationResponse> {
        if objects.iter().any(|object| object.text.trim().is_empty()) {
            return Err(Error::new("todo text must not be empty"));
        }
        let db = ctx.data::<Db>()?;
        let mut todos = db.write().await;
        let inserted: Vec<Todo> = objects
            .into_iter()
            .map(|object| Todo {
                id: TodoUuid(Uuid::new_v4()),
                text: object.text,
                done: object.done.unwrap_or(false),
            })
            .collect();
        todos.extend(inserted.iter().cloned());
        info!(count = inserted.len(), "inserted todos");
        Ok(inserted.into())
    }

    #[graphql(name = "update_todos")]
    async fn update_todos(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] filter: TodosBoolExp,
        #[graphql(name = "_set")] set: Option<TodosSetInput>,
    ) -> Result<TodosMutationResponse> {
        let db = ctx.data::<Db>()?;
        let mut todos = db.write().await;
        let mut updated = Vec::new();
        for todo in todos.iter_mut().filter(|todo| filter.matches(todo)) {
            if let Some(set) = &set {
                if let Some(text) = &set.text {
                    todo.text = text.clone();
                }
                if let Some(done) = set.done {
                    todo.done = done;
                }
            }
            updated.push(todo.clone());
        }
        info!(count = updated.len(), "updated todos");
        Ok(updated.into())
    }

    #[graphql(name = "delete_todos")]
    async fn delete_todos(
        &self,
        ctx: &Context<'_>,
        #[graphql(name = "where")] filter: TodosBoolExp,
    ) -> Result<TodosMutationResponse> {
        let db = ctx.data::<Db>()?;
        let mut todos = db.write().await;
        let (deleted, kept): (Vec<Todo>, Vec<Todo>) =
            todos.drain(..).partition(|todo| filter.matches(todo));
        *todos = kept;
        info!(count = deleted.len(), "deleted todos");
        Ok(deleted.into())
    }
}

pub fn schema(db: Db) -> TodoSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(db)
        .finish()
}

pub fn app() -> Router {
    app_with_db(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with_db(db: Db) -> Router {
    Router::new()
        .route("/graphql", post(graphql))
        .route("/health", get(health))
        .with_state(schema(db))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn graphql(
    State(schema): State<TodoSchema>,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    info!(operation = ?request.operation_name, "graphql request");
    Json(schema.execute(request).await)
}

async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(texts: &[(&str, bool)]) -> (TodoSchema, Db) {
        let db = Db::default();
        {
            let mut todos = db.try_write().unwrap();
            for (text, done) in texts {
                todos.push(Todo {
                    id: TodoUuid(Uuid::new_v4()),
                    text: text.to_string(),
                    done: *done,
                });
            }
        }
        (schema(db.clone()), db)
    }

    #[test]
    fn todo_serializes_to_json() {
        let todo = Todo {
            id: TodoUuid(Uuid::nil()),
            text: "Test".to_string(),
            done: false,
        };
        let json = serde_json::to_value(&todo).unwrap();
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
        assert_eq!(json["text"], "Test");
        assert_eq!(json["done"], false);
    }

    #[tokio::test]
    async fn insert_defaults_done_to_false() {
        let (schema, db) = seeded(&[]);
        let resp = schema
            .execute(r#"mutation { insert_todos(objects: {text: "Buy milk"}) { affected_rows returning { text done } } }"#)
            .await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);
        let data = resp.data.into_json().unwrap();
        assert_eq!(data["insert_todos"]["affected_rows"], 1);
        assert_eq!(data["insert_todos"]["returning"][0]["done"], false);
        assert_eq!(db.read().await.len(), 1);
    }

    #[tokio::test]
    async fn insert_rejects_blank_text() {
        let (schema, db) = seeded(&[]);
        let resp = schema
            .execute(r#"mutation { insert_todos(objects: {text: "  "}) { returning { id } } }"#)
            .await;
        assert_eq!(resp.errors[0].message, "todo text must not be empty");
        assert!(db.read().await.is_empty());
    }

    #[tokio::test]
    async fn update_touches_only_matching_row() {
        let (schema, db) = seeded(&[("a", false), ("b", false)]);
        let target = db.read().await[1].id.0;
        let query = format!(
            r#"mutation {{ update_todos(where: {{id: {{_eq: "{target}"}}}}, _set: {{done: true}}) {{ returning {{ text done }} }} }}"#
        );
        let resp = schema.execute(query.as_str()).await;
        assert!(resp.errors.is_empty(), "{:?}", resp.errors);

        let todos = db.read().await;
        assert!(!todos[0].done);
        assert!(todos[1].done);
    }

    #[tokio::test]
    async fn bad_uuid_is_a_validation_error() {
        let (schema, _db) = seeded(&[("a", false)]);
        let resp = schema
            .execute(r#"mutation { delete_todos(where: {id: {_eq: "not-a-uuid"}}) { returning { id } } }"#)
            .await;
        assert!(!resp.errors.is_empty());
    }

    #[tokio::test]
    async fn todos_keep_insertion_order() {
        let (schema, _db) = seeded(&[("first", false), ("second", true), ("third", false)]);
        let resp = schema.execute("{ todos { text } }").await;
        let data = resp.data.into_json().unwrap();
        let texts: Vec<&str> = data["todos"]
            .as_array()
            .unwrap()
            .iter()
            .map(|todo| todo["text"].as_str().unwrap())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }
}
