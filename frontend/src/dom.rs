//! Imperative DOM work the virtual DOM does not cover.

use log::warn;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, HtmlElement};

pub const CONTENT_SELECTOR: &str = ".content";
pub const NEW_ENTRY_ID: &str = "todo-new";
/// Attribute on the `.content` container that overrides the API base path.
pub const API_BASE_ATTRIBUTE: &str = "data-api-base";

pub fn content_container() -> Option<Element> {
    window()?
        .document()?
        .query_selector(CONTENT_SELECTOR)
        .ok()
        .flatten()
}

/// Markup inside the element an event fired on, as the user left it.
pub fn event_html(event: &Event) -> String {
    event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok())
        .map(|element| element.inner_html())
        .unwrap_or_default()
}

pub fn alert(message: &str) {
    if let Some(window) = window() {
        if let Err(err) = window.alert_with_message(message) {
            warn!("alert {message:?} failed: {err:?}");
        }
    }
}

fn element_by_id(id: &str) -> Option<Element> {
    window()?.document()?.get_element_by_id(id)
}

pub fn blur_new_entry() {
    if let Some(editor) = element_by_id(NEW_ENTRY_ID).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        if let Err(err) = editor.blur() {
            warn!("blurring #{NEW_ENTRY_ID} failed: {err:?}");
        }
    }
}

pub fn clear_new_entry() {
    if let Some(editor) = element_by_id(NEW_ENTRY_ID) {
        editor.set_inner_html("");
    }
}
