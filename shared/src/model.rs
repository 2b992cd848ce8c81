use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier of a todo item.
///
/// The server is free to send numbers or strings; both are kept verbatim so
/// the id can be echoed back in item URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
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

impl From<u64> for TodoId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl<'de> Deserialize<'de> for TodoId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(serde_json::Number),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => TodoId(n.to_string()),
            RawId::Text(s) => TodoId(s),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    #[serde(default)]
    pub complete: bool,
}

impl Todo {
    pub fn new(id: impl Into<TodoId>, title: impl Into<String>, complete: bool) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            complete,
        }
    }

    /// Element id of the editable title.
    pub fn dom_id(&self) -> String {
        format!("todo-{}", self.id)
    }

    pub fn checkbox_dom_id(&self) -> String {
        format!("todo-{}-cb", self.id)
    }

    pub fn delete_dom_id(&self) -> String {
        format!("todo-{}-delete", self.id)
    }
}

/// Form body of a create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
}

impl NewTodo {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![("title", self.title.clone())]
    }
}

/// Form body of an update request. Both fields are always sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoUpdate {
    pub title: String,
    pub complete: bool,
}

impl TodoUpdate {
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("complete", self.complete.to_string()),
        ]
    }
}

/// Decodes a list response body.
pub fn decode_todos(body: &str) -> serde_json::Result<Vec<Todo>> {
    serde_json::from_str(body)
}
