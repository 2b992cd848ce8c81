use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use pretty_assertions::assert_eq;
use todo_shared::{
    dispatch, ApiConfig, ApiError, ApiRequest, Effect, Entry, Method, Msg, NewTodo, Operation,
    Todo, TodoApi, TodoId, TodoList, TodoUpdate,
};

/// In-memory backend that records every request it sees as `METHOD url form`.
struct RecordingApi {
    config: ApiConfig,
    todos: RefCell<Vec<Todo>>,
    next_id: Cell<u64>,
    /// Statuses to answer with instead of the success code, oldest first.
    forced: RefCell<VecDeque<u16>>,
    log: RefCell<Vec<String>>,
}

impl RecordingApi {
    fn new(todos: Vec<Todo>) -> Self {
        Self {
            config: ApiConfig::new("/api/v1/todo"),
            todos: RefCell::new(todos),
            next_id: Cell::new(100),
            forced: RefCell::new(VecDeque::new()),
            log: RefCell::new(Vec::new()),
        }
    }

    fn fail_next(&self, status: u16) {
        self.forced.borrow_mut().push_back(status);
    }

    fn record(&self, request: &ApiRequest) -> Result<(), ApiError> {
        let mut line = format!("{} {}", request.method().as_str(), request.url(&self.config));
        if let Some(form) = request.form() {
            let body: Vec<String> = form.iter().map(|(k, v)| format!("{k}={v}")).collect();
            line.push(' ');
            line.push_str(&body.join("&"));
        }
        self.log.borrow_mut().push(line);

        let operation = request.operation();
        let status = self
            .forced
            .borrow_mut()
            .pop_front()
            .unwrap_or(operation.expected_status());
        operation.check_status(status)
    }

    fn requests(&self) -> Vec<String> {
        self.log.borrow_mut().drain(..).collect()
    }
}

impl TodoApi for RecordingApi {
    async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        self.record(&ApiRequest::List)?;
        Ok(self.todos.borrow().clone())
    }

    async fn create(&self, new_todo: &NewTodo) -> Result<(), ApiError> {
        self.record(&ApiRequest::Create(new_todo.clone()))?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.todos
            .borrow_mut()
            .push(Todo::new(id, new_todo.title.clone(), false));
        Ok(())
    }

    async fn update(&self, id: &TodoId, update: &TodoUpdate) -> Result<(), ApiError> {
        self.record(&ApiRequest::Update(id.clone(), update.clone()))?;
        if let Some(todo) = self.todos.borrow_mut().iter_mut().find(|t| &t.id == id) {
            todo.title = update.title.clone();
            todo.complete = update.complete;
        }
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> Result<(), ApiError> {
        self.record(&ApiRequest::Delete(id.clone()))?;
        self.todos.borrow_mut().retain(|t| &t.id != id);
        Ok(())
    }
}

/// Feeds `msg` in and keeps dispatching request effects until the controller
/// settles. Returns the effects the frontend would have carried out.
async fn drive(list: &mut TodoList, api: &RecordingApi, msg: Msg) -> Vec<Effect> {
    let mut pending = VecDeque::from([msg]);
    let mut handled = Vec::new();
    while let Some(msg) = pending.pop_front() {
        for effect in list.update(msg) {
            match effect {
                Effect::Request(request) => pending.push_back(dispatch(api, request).await),
                other => handled.push(other),
            }
        }
    }
    handled
}

fn seed() -> Vec<Todo> {
    vec![
        Todo::new(5_u64, "Buy milk", false),
        Todo::new(7_u64, "Walk the dog", true),
        Todo::new(9_u64, "File taxes", false),
    ]
}

fn checked_states(list: &TodoList) -> Vec<Option<bool>> {
    list.entries()
        .into_iter()
        .map(|entry| match entry {
            Entry::Todo(todo) => Some(todo.complete),
            Entry::NewTodo => None,
        })
        .collect()
}

#[tokio::test]
async fn initial_load_renders_every_item_and_the_placeholder() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();

    let effects = drive(&mut list, &api, Msg::Refresh).await;

    assert!(effects.is_empty());
    assert_eq!(api.requests(), vec!["GET /api/v1/todo"]);
    assert_eq!(
        checked_states(&list),
        vec![Some(false), Some(true), Some(false), None]
    );
}

#[tokio::test]
async fn toggle_posts_title_and_new_state_then_refreshes() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    drive(&mut list, &api, Msg::ToggleComplete(TodoId::from(5_u64))).await;

    assert_eq!(
        api.requests(),
        vec![
            "POST /api/v1/todo/5 title=Buy milk&complete=true",
            "GET /api/v1/todo",
        ]
    );
    assert!(list.rows()[0].complete);
}

#[tokio::test]
async fn title_edit_preserves_completion() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    drive(
        &mut list,
        &api,
        Msg::TitleEdited(TodoId::from(7_u64), "Walk the <i>cat</i>".to_string()),
    )
    .await;

    assert_eq!(
        api.requests(),
        vec![
            "POST /api/v1/todo/7 title=Walk the <i>cat</i>&complete=true",
            "GET /api/v1/todo",
        ]
    );
    assert_eq!(list.rows()[1].title, "Walk the <i>cat</i>");
}

#[tokio::test]
async fn whitespace_entry_sends_nothing() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    let effects = drive(&mut list, &api, Msg::NewEntryBlurred(" \t ".to_string())).await;

    assert_eq!(effects, vec![Effect::ClearNewEntry]);
    assert!(api.requests().is_empty());
}

#[tokio::test]
async fn enter_then_blur_creates_and_refreshes() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    let effects = drive(&mut list, &api, Msg::NewEntryKey("Enter".to_string())).await;
    assert_eq!(effects, vec![Effect::BlurNewEntry]);

    let effects = drive(&mut list, &api, Msg::NewEntryBlurred("Call mom".to_string())).await;

    assert_eq!(effects, vec![Effect::ClearNewEntry]);
    assert_eq!(
        api.requests(),
        vec!["POST /api/v1/todo title=Call mom", "GET /api/v1/todo"]
    );
    assert_eq!(list.rows().len(), 4);
    assert_eq!(list.rows()[3].id, TodoId::from(100_u64));
    assert_eq!(list.entries().len(), 5);
}

#[tokio::test]
async fn delete_refreshes_and_row_disappears() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    drive(&mut list, &api, Msg::Delete(TodoId::from(7_u64))).await;

    assert_eq!(
        api.requests(),
        vec!["DELETE /api/v1/todo/7", "GET /api/v1/todo"]
    );
    assert!(list.rows().iter().all(|t| t.id != TodoId::from(7_u64)));
    assert_eq!(list.rows().len(), 2);
}

#[tokio::test]
async fn bad_request_alerts_and_keeps_rendered_rows() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    let before = list.rows().to_vec();

    api.fail_next(400);
    let effects = drive(&mut list, &api, Msg::Refresh).await;
    assert_eq!(
        effects,
        vec![Effect::Alert("There was an error 400".to_string())]
    );
    assert_eq!(list.rows(), before.as_slice());

    api.fail_next(400);
    let effects = drive(&mut list, &api, Msg::Delete(TodoId::from(9_u64))).await;
    assert_eq!(
        effects,
        vec![Effect::Alert("There was an error 400".to_string())]
    );
    assert_eq!(list.rows(), before.as_slice());
}

#[tokio::test]
async fn rejected_toggle_alerts_once_and_keeps_the_clicked_state() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    api.fail_next(400);
    let effects = drive(&mut list, &api, Msg::ToggleComplete(TodoId::from(5_u64))).await;

    assert_eq!(
        effects,
        vec![Effect::Alert("There was an error 400".to_string())]
    );
    // No refresh after the rejected update.
    assert_eq!(
        api.requests(),
        vec!["POST /api/v1/todo/5 title=Buy milk&complete=true"]
    );
    assert!(list.rows()[0].complete);
    assert_eq!(list.generation(), 1);
}

#[tokio::test]
async fn rejected_title_edit_alerts_once_and_keeps_the_typed_title() {
    let api = RecordingApi::new(seed());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    api.fail_next(400);
    let effects = drive(
        &mut list,
        &api,
        Msg::TitleEdited(TodoId::from(9_u64), "File taxes today".to_string()),
    )
    .await;

    assert_eq!(
        effects,
        vec![Effect::Alert("There was an error 400".to_string())]
    );
    assert_eq!(
        api.requests(),
        vec!["POST /api/v1/todo/9 title=File taxes today&complete=false"]
    );
    assert_eq!(list.rows()[2].title, "File taxes today");
    assert!(!list.rows()[2].complete);
}

#[tokio::test]
async fn markup_title_round_trips_unescaped() {
    let api = RecordingApi::new(vec![Todo::new(3_u64, "Walk the <b>dog</b>", false)]);
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    drive(&mut list, &api, Msg::ToggleComplete(TodoId::from(3_u64))).await;
    assert_eq!(
        api.requests(),
        vec![
            "POST /api/v1/todo/3 title=Walk the <b>dog</b>&complete=true",
            "GET /api/v1/todo",
        ]
    );

    drive(
        &mut list,
        &api,
        Msg::TitleEdited(TodoId::from(3_u64), "Walk the <b>dog</b> <i>twice</i>".to_string()),
    )
    .await;
    assert_eq!(list.rows()[0].title, "Walk the <b>dog</b> <i>twice</i>");
    assert_eq!(
        api.todos.borrow()[0].title,
        "Walk the <b>dog</b> <i>twice</i>"
    );
}

#[tokio::test]
async fn unexpected_status_on_create_names_201() {
    let api = RecordingApi::new(Vec::new());
    let mut list = TodoList::new();
    drive(&mut list, &api, Msg::Refresh).await;
    api.requests();

    api.fail_next(500);
    let effects = drive(&mut list, &api, Msg::NewEntryBlurred("Pay rent".to_string())).await;

    assert_eq!(
        effects,
        vec![Effect::Alert(
            "something else other than 201 was returned".to_string()
        )]
    );
    // No refresh after a failure.
    assert_eq!(api.requests(), vec!["POST /api/v1/todo title=Pay rent"]);
    assert!(list.rows().is_empty());
}

#[tokio::test]
async fn dispatch_maps_requests_onto_the_client() {
    let api = RecordingApi::new(seed());

    let msg = dispatch(&api, ApiRequest::Delete(TodoId::from(5_u64))).await;
    assert_eq!(msg, Msg::Mutated(Operation::Delete, Ok(())));

    api.fail_next(404);
    let msg = dispatch(&api, ApiRequest::List).await;
    assert_eq!(
        msg,
        Msg::Listed(Err(ApiError::UnexpectedStatus {
            operation: Operation::List,
            status: 404,
        }))
    );
    assert_eq!(ApiRequest::List.method(), Method::Get);
}
