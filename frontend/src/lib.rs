use log::{info, warn};
use sauron::{
    html::{attributes::*, *},
    prelude::*,
};
use todo_shared::{dispatch, ApiConfig, Effect, Entry, Msg, Todo, TodoList, NEW_TODO_PLACEHOLDER};

mod dom;
mod http;

use http::WebApi;

pub struct App {
    list: TodoList,
    api: WebApi,
}

impl App {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            list: TodoList::new(),
            api: WebApi::new(config),
        }
    }

    /// Carries out the controller's effects. Requests become commands whose
    /// result is the next message; everything else happens right away.
    fn perform(&self, effects: Vec<Effect>) -> Cmd<Msg> {
        let mut cmds = Vec::new();
        for effect in effects {
            match effect {
                Effect::Request(request) => {
                    let api = self.api.clone();
                    cmds.push(Cmd::new(async move { dispatch(&api, request).await }));
                }
                Effect::Alert(message) => dom::alert(&message),
                Effect::BlurNewEntry => dom::blur_new_entry(),
                Effect::ClearNewEntry => dom::clear_new_entry(),
            }
        }
        Cmd::batch(cmds)
    }
}

impl Application for App {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        info!("listing todos from {}", self.api.config().base_path());
        Cmd::new(async { Msg::Refresh })
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        let effects = self.list.update(msg);
        self.perform(effects)
    }

    fn view(&self) -> Node<Msg> {
        // Keys change with every list, so sauron builds each row from scratch
        // rather than patching nodes the user may have edited in place.
        let generation = self.list.generation();
        ul(
            [class("list")],
            self.list
                .entries()
                .into_iter()
                .map(|entry| match entry {
                    Entry::Todo(todo) => li(
                        [key(format!("{generation}-{}", todo.id))],
                        [self.view_todo(todo)],
                    ),
                    Entry::NewTodo => li(
                        [key(format!("{generation}-{}", dom::NEW_ENTRY_ID))],
                        [self.view_new_todo()],
                    ),
                })
                .collect::<Vec<_>>(),
        )
    }
}

impl App {
    fn view_todo(&self, todo: &Todo) -> Node<Msg> {
        let toggle_id = todo.id.clone();
        let edit_id = todo.id.clone();
        let delete_id = todo.id.clone();

        div(
            [class(if todo.complete { "todo complete" } else { "todo" })],
            [h1(
                [],
                [
                    input(
                        [
                            r#type("checkbox"),
                            id(&todo.checkbox_dom_id()),
                            checked(todo.complete),
                            on_change(move |_| Msg::ToggleComplete(toggle_id.clone())),
                        ],
                        [],
                    ),
                    span(
                        [
                            class("editor"),
                            id(&todo.dom_id()),
                            attr("contenteditable", "true"),
                            on_blur(move |event| {
                                Msg::TitleEdited(edit_id.clone(), dom::event_html(&event))
                            }),
                        ],
                        [title_node(&todo.title)],
                    ),
                    span(
                        [
                            class("material-icons delete"),
                            id(&todo.delete_dom_id()),
                            on_click(move |_| Msg::Delete(delete_id.clone())),
                        ],
                        [text("delete")],
                    ),
                ],
            )],
        )
    }

    fn view_new_todo(&self) -> Node<Msg> {
        div(
            [class("todo")],
            [h1(
                [],
                [
                    input(
                        [r#type("checkbox"), id("todo-new-cb"), disabled(true)],
                        [],
                    ),
                    div(
                        [
                            class("editor editor-new"),
                            id(dom::NEW_ENTRY_ID),
                            attr("contenteditable", "true"),
                            attr("data-placeholder", NEW_TODO_PLACEHOLDER),
                            on_blur(|event| Msg::NewEntryBlurred(dom::event_html(&event))),
                            on_keypress(|event| {
                                let key = event.key();
                                // Enter submits instead of inserting a line break.
                                if key == "Enter" {
                                    event.prevent_default();
                                }
                                Msg::NewEntryKey(key)
                            }),
                        ],
                        [],
                    ),
                ],
            )],
        )
    }
}

/// Titles are HTML fragments and render as markup, not as escaped text.
fn title_node(title: &str) -> Node<Msg> {
    match sauron::parse_html::<Msg>(title) {
        Ok(Some(node)) => node,
        Ok(None) => text(""),
        Err(err) => {
            warn!("title {title:?} is not valid html: {err:?}");
            text(title)
        }
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    _ = console_log::init_with_level(log::Level::Debug);

    let Some(container) = dom::content_container() else {
        warn!("no {} element to mount into", dom::CONTENT_SELECTOR);
        return;
    };

    let override_base = container.get_attribute(dom::API_BASE_ATTRIBUTE);
    let config = ApiConfig::resolve(override_base.as_deref());

    container.set_inner_html("");
    Program::append_to_mount(App::new(config), &container);
}
