//! The list view as a message-driven state machine.
//!
//! [`TodoList::update`] never touches the network or the DOM. It returns
//! [`Effect`]s for the frontend to carry out; request effects are run with
//! [`dispatch`], whose result is fed back in as the next [`Msg`].

use log::{debug, warn};

use crate::api::{ApiRequest, Operation, TodoApi};
use crate::error::ApiError;
use crate::model::{NewTodo, Todo, TodoId, TodoUpdate};

pub const NEW_TODO_PLACEHOLDER: &str = "Type something here to add a new task. ";

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Fetch the whole list again.
    Refresh,
    Listed(Result<Vec<Todo>, ApiError>),
    /// Checkbox of a row was clicked.
    ToggleComplete(TodoId),
    /// Title of a row lost focus with this text.
    TitleEdited(TodoId, String),
    Delete(TodoId),
    /// The new-item field lost focus with this text.
    NewEntryBlurred(String),
    /// A key was pressed inside the new-item field.
    NewEntryKey(String),
    Mutated(Operation, Result<(), ApiError>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Request(ApiRequest),
    Alert(String),
    BlurNewEntry,
    ClearNewEntry,
}

/// One rendered line of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Todo(&'a Todo),
    /// Trailing placeholder for creating an item.
    NewTodo,
}

#[derive(Debug, Clone, Default)]
pub struct TodoList {
    rows: Vec<Todo>,
    loaded: bool,
    generation: u64,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Todo] {
        &self.rows
    }

    /// Whether a list response has been rendered yet.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Bumped on every successful list, so each refresh renders fresh rows
    /// instead of patching ones the user may have edited in place.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> Vec<Entry<'_>> {
        self.rows
            .iter()
            .map(Entry::Todo)
            .chain(std::iter::once(Entry::NewTodo))
            .collect()
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Refresh => vec![Effect::Request(ApiRequest::List)],
            Msg::Listed(Ok(todos)) => {
                debug!("rendering {} todos", todos.len());
                self.rows = todos;
                self.loaded = true;
                self.generation += 1;
                Vec::new()
            }
            Msg::Listed(Err(err)) => Self::fail(err),
            Msg::ToggleComplete(id) => {
                let Some(row) = self.row_mut(&id) else {
                    return Vec::new();
                };
                // The checkbox already shows the new state.
                row.complete = !row.complete;
                let update = TodoUpdate {
                    title: row.title.clone(),
                    complete: row.complete,
                };
                vec![Effect::Request(ApiRequest::Update(id, update))]
            }
            Msg::TitleEdited(id, title) => {
                let Some(row) = self.row_mut(&id) else {
                    return Vec::new();
                };
                row.title = title;
                let update = TodoUpdate {
                    title: row.title.clone(),
                    complete: row.complete,
                };
                vec![Effect::Request(ApiRequest::Update(id, update))]
            }
            Msg::Delete(id) => {
                if self.row_mut(&id).is_none() {
                    return Vec::new();
                }
                vec![Effect::Request(ApiRequest::Delete(id))]
            }
            Msg::NewEntryBlurred(title) => {
                if title.trim().is_empty() {
                    return vec![Effect::ClearNewEntry];
                }
                vec![Effect::Request(ApiRequest::Create(NewTodo { title }))]
            }
            Msg::NewEntryKey(key) => {
                if key == "Enter" {
                    vec![Effect::BlurNewEntry]
                } else {
                    Vec::new()
                }
            }
            Msg::Mutated(Operation::Create, Ok(())) => vec![
                Effect::ClearNewEntry,
                Effect::Request(ApiRequest::List),
            ],
            Msg::Mutated(operation, Ok(())) => {
                debug!("{operation} succeeded, refreshing");
                vec![Effect::Request(ApiRequest::List)]
            }
            Msg::Mutated(_, Err(err)) => Self::fail(err),
        }
    }

    fn row_mut(&mut self, id: &TodoId) -> Option<&mut Todo> {
        let row = self.rows.iter_mut().find(|row| &row.id == id);
        if row.is_none() {
            warn!("no rendered todo with id {id}");
        }
        row
    }

    fn fail(err: ApiError) -> Vec<Effect> {
        if err.is_client_error() {
            debug!("{err}");
        } else {
            warn!("{err}");
        }
        vec![Effect::Alert(err.alert_message())]
    }
}

/// Runs one request and turns its outcome into the follow-up message.
pub async fn dispatch<A: TodoApi>(api: &A, request: ApiRequest) -> Msg {
    debug!("{} {:?}", request.operation(), request);
    match request {
        ApiRequest::List => Msg::Listed(api.list().await),
        ApiRequest::Create(new_todo) => {
            Msg::Mutated(Operation::Create, api.create(&new_todo).await)
        }
        ApiRequest::Update(id, update) => {
            Msg::Mutated(Operation::Update, api.update(&id, &update).await)
        }
        ApiRequest::Delete(id) => Msg::Mutated(Operation::Delete, api.delete(&id).await),
    }
}
