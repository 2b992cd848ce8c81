pub mod api;
pub mod controller;
pub mod error;
pub mod model;

pub use api::{ApiConfig, ApiRequest, Method, Operation, TodoApi, DEFAULT_BASE_PATH};
pub use controller::{dispatch, Effect, Entry, Msg, TodoList, NEW_TODO_PLACEHOLDER};
pub use error::ApiError;
pub use model::{decode_todos, NewTodo, Todo, TodoId, TodoUpdate};
