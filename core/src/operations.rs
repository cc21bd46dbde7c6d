//! The GraphQL documents this client sends.
//!
//! The remote schema is Hasura-shaped: writes go through `insert_todos`,
//! `update_todos` and `delete_todos`, each answering with the affected rows
//! under `returning`.

use std::fmt;

pub const GET_TODOS: &str = "query getTodos { todos { id text done } }";

pub const ADD_TODO: &str = "mutation addTodo($text: String!) { insert_todos(objects: {text: $text}) { returning { id text done } } }";

pub const TOGGLE_TODO: &str = "mutation toggleTodo($id: uuid!, $done: Boolean!) { update_todos(where: {id: {_eq: $id}}, _set: {done: $done}) { returning { id text done } } }";

pub const DELETE_TODO: &str = "mutation deleteTodo($id: uuid!) { delete_todos(where: {id: {_eq: $id}}) { returning { id text done } } }";

/// One named operation: the list query or one of the three mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    GetTodos,
    AddTodo,
    ToggleTodo,
    DeleteTodo,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::GetTodos => "getTodos",
            Operation::AddTodo => "addTodo",
            Operation::ToggleTodo => "toggleTodo",
            Operation::DeleteTodo => "deleteTodo",
        }
    }

    pub fn document(self) -> &'static str {
        match self {
            Operation::GetTodos => GET_TODOS,
            Operation::AddTodo => ADD_TODO,
            Operation::ToggleTodo => TOGGLE_TODO,
            Operation::DeleteTodo => DELETE_TODO,
        }
    }

    pub fn is_mutation(self) -> bool {
        !matches!(self, Operation::GetTodos)
    }

    /// Look an operation up by its GraphQL operation name.
    pub fn from_name(name: &str) -> Option<Self> {
        [
            Operation::GetTodos,
            Operation::AddTodo,
            Operation::ToggleTodo,
            Operation::DeleteTodo,
        ]
        .into_iter()
        .find(|op| op.name() == name)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
