//! DOM snapshot helpers.
//!
//! Event handlers here follow a snapshot-then-decide shape: the interesting
//! parts of an event are copied into plain core types, the decision is made
//! by pure code, and only the chosen action touches the DOM again.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, HtmlAnchorElement, HtmlButtonElement, HtmlElement, MouseEvent, Window};

use vitrine_core::{AnchorInfo, ButtonInfo, ClickContext, CurrentLocation};

/// Copies the button and modifier state off a mouse event.
pub fn click_context(event: &MouseEvent) -> ClickContext {
    ClickContext {
        button: event.button(),
        meta: event.meta_key(),
        ctrl: event.ctrl_key(),
        shift: event.shift_key(),
        alt: event.alt_key(),
    }
}

/// Finds the anchor an event passed through, if any. Walks the composed
/// path so clicks on nested markup (icons, spans) and shadow roots still
/// resolve to their link.
pub fn anchor_from_event(event: &Event) -> Option<HtmlAnchorElement> {
    find_in_path::<HtmlAnchorElement>(event)
}

/// Finds the button an event passed through, if any.
pub fn button_from_event(event: &Event) -> Option<HtmlButtonElement> {
    find_in_path::<HtmlButtonElement>(event)
}

fn find_in_path<T: JsCast>(event: &Event) -> Option<T> {
    for node in event.composed_path().iter() {
        if let Ok(found) = node.dyn_into::<T>() {
            return Some(found);
        }
    }
    None
}

/// Snapshot of the routing-relevant anchor attributes. Reads the raw
/// `href` attribute rather than the resolved property so relative paths
/// stay relative until the decision layer resolves them.
pub fn anchor_info(anchor: &HtmlAnchorElement) -> AnchorInfo {
    AnchorInfo {
        href: anchor.get_attribute("href"),
        target: anchor.get_attribute("target"),
        download: anchor.has_attribute("download"),
    }
}

/// Snapshot of the routing-relevant button attributes.
pub fn button_info(button: &HtmlButtonElement) -> ButtonInfo {
    ButtonInfo {
        onclick: button.get_attribute("onclick"),
    }
}

/// The document URL clicks are judged against.
pub fn current_location(window: &Window) -> Option<CurrentLocation> {
    let href = window.location().href().ok()?;
    CurrentLocation::parse(&href)
}

/// Renders a JS error value into something loggable.
pub fn js_error_string(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

/// Runs `callback` on the next animation frame.
pub fn next_frame(callback: impl FnOnce() + 'static) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let frame = Closure::once_into_js(callback);
    let _ = window.request_animation_frame(frame.unchecked_ref());
}

/// Runs `callback` after two animation frames, once the browser has laid
/// out and painted whatever was just inserted.
pub fn after_layout(callback: impl FnOnce() + 'static) {
    next_frame(move || next_frame(callback));
}

/// Forces a synchronous layout pass so a following style change
/// transitions from the element's current state.
pub fn force_reflow(element: &HtmlElement) {
    let _ = element.offset_height();
}

/// Collects the elements matching `selector` under `document`.
pub fn elements(document: &web_sys::Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    nodes_to_elements(&list)
}

/// Collects the elements matching `selector` under `root`.
pub fn scoped_elements(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    nodes_to_elements(&list)
}

fn nodes_to_elements(list: &web_sys::NodeList) -> Vec<Element> {
    let mut out = Vec::with_capacity(list.length() as usize);
    for index in 0..list.length() {
        if let Some(element) = list.get(index).and_then(|node| node.dyn_into::<Element>().ok()) {
            out.push(element);
        }
    }
    out
}

/// The element an event originated on, when it is an element at all.
pub fn event_target_element(event: &Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}
