use std::fmt;

use crate::error::{ApiError, Result};
use crate::model::{NewTodo, Todo, TodoId, TodoUpdate};

pub const DEFAULT_BASE_PATH: &str = "//127.0.0.1:9000/api/v1/todo";

/// Where the todo collection lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_path: String,
}

impl ApiConfig {
    pub fn new(base_path: impl Into<String>) -> Self {
        let base_path = base_path.into();
        let trimmed = base_path.trim().trim_end_matches('/');
        Self {
            base_path: trimmed.to_string(),
        }
    }

    /// Picks the first non-blank base path, falling back to the build-time
    /// `TODO_API_BASE` and then to [`DEFAULT_BASE_PATH`].
    pub fn resolve(override_base: Option<&str>) -> Self {
        override_base
            .filter(|base| !base.trim().is_empty())
            .or(option_env!("TODO_API_BASE"))
            .map(ApiConfig::new)
            .unwrap_or_default()
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn collection_url(&self) -> String {
        self.base_path.clone()
    }

    pub fn item_url(&self, id: &TodoId) -> String {
        format!("{}/{}", self.base_path, id)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_PATH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn expected_status(self) -> u16 {
        match self {
            Operation::List | Operation::Update => 200,
            Operation::Create => 201,
            Operation::Delete => 204,
        }
    }

    /// Sorts a response status into success, 400, or everything else.
    pub fn check_status(self, status: u16) -> Result<()> {
        if status == self.expected_status() {
            Ok(())
        } else if status == 400 {
            Err(ApiError::BadRequest { operation: self })
        } else {
            Err(ApiError::UnexpectedStatus {
                operation: self,
                status,
            })
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

/// One call against the todo endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    List,
    Create(NewTodo),
    Update(TodoId, TodoUpdate),
    Delete(TodoId),
}

impl ApiRequest {
    pub fn operation(&self) -> Operation {
        match self {
            ApiRequest::List => Operation::List,
            ApiRequest::Create(_) => Operation::Create,
            ApiRequest::Update(..) => Operation::Update,
            ApiRequest::Delete(_) => Operation::Delete,
        }
    }

    pub fn method(&self) -> Method {
        match self {
            ApiRequest::List => Method::Get,
            ApiRequest::Create(_) | ApiRequest::Update(..) => Method::Post,
            ApiRequest::Delete(_) => Method::Delete,
        }
    }

    pub fn url(&self, config: &ApiConfig) -> String {
        match self {
            ApiRequest::List | ApiRequest::Create(_) => config.collection_url(),
            ApiRequest::Update(id, _) | ApiRequest::Delete(id) => config.item_url(id),
        }
    }

    /// Form fields sent as the request body, if the request has one.
    pub fn form(&self) -> Option<Vec<(&'static str, String)>> {
        match self {
            ApiRequest::Create(new_todo) => Some(new_todo.form_fields()),
            ApiRequest::Update(_, update) => Some(update.form_fields()),
            ApiRequest::List | ApiRequest::Delete(_) => None,
        }
    }
}

/// The four calls the view makes against the backend.
///
/// Futures are not required to be `Send`; the browser implementation runs on
/// the single JS thread.
#[allow(async_fn_in_trait)]
pub trait TodoApi {
    async fn list(&self) -> Result<Vec<Todo>>;
    async fn create(&self, new_todo: &NewTodo) -> Result<()>;
    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<()>;
    async fn delete(&self, id: &TodoId) -> Result<()>;
}
